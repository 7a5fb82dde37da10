//! Trust anchor resolution
//!
//! Turns caller-supplied key material into a verification key the envelope
//! verifier can use. A public key is trusted as given; a certificate is
//! trusted only after its chain, identity, issuer and timestamp checks pass.

use crate::chain::verify_certificate_chain;
use crate::error::{Error, Result};
use crate::options::{IdentityMatcher, VerificationOptions};
use crate::oracle::{OracleError, TimestampVerifier};
use attest_crypto::{parse_certificate_info, CertificateDer, PublicKeySpki, VerificationKey};
use tokio_util::sync::CancellationToken;

/// Key material the caller trusts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustAnchor {
    /// A bare public key
    PublicKey(PublicKeySpki),
    /// A leaf certificate plus the chain `[intermediate..., root]` it is
    /// validated against
    CertificateChain {
        /// Signing certificate
        leaf: CertificateDer,
        /// Intermediates followed by the trusted last entry
        chain: Vec<CertificateDer>,
    },
}

/// Everything needed to resolve a trust anchor
pub struct ResolveContext<'a> {
    /// Caller options (constraints, root policy, validation time)
    pub options: &'a VerificationOptions,
    /// Signed certificate timestamp checker, if one is configured
    pub timestamps: Option<&'a dyn TimestampVerifier>,
    /// Cancellation signal passed on to collaborators
    pub cancel: &'a CancellationToken,
}

/// A trust anchor that passed resolution
#[derive(Debug, Clone)]
pub struct ResolvedAnchor {
    /// Key that envelope signatures must verify under
    pub key: VerificationKey,
    /// Signer identity from the leaf certificate's SAN
    pub identity: Option<String>,
    /// OIDC issuer from the leaf certificate
    pub issuer: Option<String>,
}

impl TrustAnchor {
    /// Create an anchor from a PEM-encoded public key
    pub fn from_public_key_pem(pem: &str) -> Result<Self> {
        let key = PublicKeySpki::from_pem(pem)
            .map_err(|e| Error::InvalidTrustAnchor(format!("invalid public key: {}", e)))?;
        Ok(TrustAnchor::PublicKey(key))
    }

    /// Create an anchor from a PEM leaf certificate and a PEM chain bundle
    ///
    /// The bundle lists intermediates first and the trusted certificate last.
    pub fn from_certificate_pem(leaf_pem: &str, chain_pem: &str) -> Result<Self> {
        let leaf = CertificateDer::from_pem(leaf_pem)
            .map_err(|e| Error::InvalidTrustAnchor(format!("invalid leaf certificate: {}", e)))?;
        let chain = CertificateDer::from_pem_bundle(chain_pem)
            .map_err(|e| Error::InvalidTrustAnchor(format!("invalid certificate chain: {}", e)))?;
        Ok(TrustAnchor::CertificateChain { leaf, chain })
    }

    /// Resolve the anchor into a verification key
    pub fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<ResolvedAnchor> {
        match self {
            TrustAnchor::PublicKey(spki) => resolve_public_key(spki, ctx.options),
            TrustAnchor::CertificateChain { leaf, chain } => resolve_certificate(leaf, chain, ctx),
        }
    }
}

fn resolve_public_key(spki: &PublicKeySpki, options: &VerificationOptions) -> Result<ResolvedAnchor> {
    if options.identity.is_some() || options.issuer.is_some() {
        tracing::warn!("Identity and issuer constraints do not apply to a public key anchor");
    }

    let key = VerificationKey::from_spki(spki)
        .map_err(|e| Error::InvalidTrustAnchor(format!("unusable public key: {}", e)))?;

    tracing::debug!(scheme = %key.scheme, "Resolved public key anchor");

    Ok(ResolvedAnchor {
        key,
        identity: None,
        issuer: None,
    })
}

fn resolve_certificate(
    leaf: &CertificateDer,
    chain: &[CertificateDer],
    ctx: &ResolveContext<'_>,
) -> Result<ResolvedAnchor> {
    let options = ctx.options;

    verify_certificate_chain(
        leaf,
        chain,
        options.root_policy,
        options.effective_validation_time(),
    )?;

    let cert_info = parse_certificate_info(leaf.as_bytes())
        .map_err(|e| Error::InvalidTrustAnchor(format!("failed to parse certificate: {}", e)))?;
    tracing::debug!(
        identity = ?cert_info.identity,
        not_before = cert_info.not_before,
        not_after = cert_info.not_after,
        "Parsed leaf certificate"
    );

    if let Some(expected) = &options.identity {
        check_constraint(expected, cert_info.identity.as_deref(), "identity")
            .map_err(Error::IdentityMismatch)?;
    }

    if let Some(expected) = &options.issuer {
        check_constraint(expected, cert_info.issuer.as_deref(), "issuer")
            .map_err(Error::IssuerMismatch)?;
    }

    if !options.ignore_sct {
        let Some(timestamps) = ctx.timestamps else {
            return Err(Error::TimestampUnverified(
                "no timestamp verifier configured".to_string(),
            ));
        };
        timestamps
            .check_timestamp(leaf, ctx.cancel)
            .map_err(|e| match e {
                OracleError::Cancelled => {
                    Error::Cancelled("timestamp verification cancelled".to_string())
                }
                OracleError::Rejected(reason) => Error::TimestampUnverified(reason),
            })?;
    }

    let key = cert_info
        .verification_key()
        .map_err(|e| Error::InvalidTrustAnchor(format!("unusable certificate key: {}", e)))?;

    tracing::debug!(
        identity = cert_info.identity.as_deref().unwrap_or(""),
        issuer = cert_info.issuer.as_deref().unwrap_or(""),
        "Resolved certificate anchor"
    );

    Ok(ResolvedAnchor {
        key,
        identity: cert_info.identity,
        issuer: cert_info.issuer,
    })
}

/// Check a certificate field against a matcher, returning the failure detail
fn check_constraint(
    expected: &IdentityMatcher,
    actual: Option<&str>,
    field: &str,
) -> std::result::Result<(), String> {
    let Some(actual) = actual else {
        return Err(format!("certificate has no {}, expected {}", field, expected));
    };

    match expected.matches(actual) {
        Ok(true) => Ok(()),
        Ok(false) => Err(format!("expected {} {}, got {:?}", field, expected, actual)),
        Err(e) => Err(format!("invalid {} pattern {}: {}", field, expected, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNER_PUB: &str = include_str!("../test_data/signer.pub");
    const LEAF_PEM: &str = include_str!("../test_data/leaf.pem");
    const CHAIN_PEM: &str = include_str!("../test_data/chain.pem");

    fn resolve(anchor: &TrustAnchor, options: &VerificationOptions) -> Result<ResolvedAnchor> {
        let cancel = CancellationToken::new();
        anchor.resolve(&ResolveContext {
            options,
            timestamps: None,
            cancel: &cancel,
        })
    }

    #[test]
    fn test_public_key_anchor() {
        let anchor = TrustAnchor::from_public_key_pem(SIGNER_PUB).unwrap();
        let resolved = resolve(&anchor, &VerificationOptions::default()).unwrap();
        assert_eq!(resolved.key.scheme, attest_crypto::SigningScheme::EcdsaP256Sha256);
        assert!(resolved.identity.is_none());
    }

    #[test]
    fn test_invalid_public_key_pem() {
        let err = TrustAnchor::from_public_key_pem("not a key").unwrap_err();
        assert!(matches!(err, Error::InvalidTrustAnchor(_)));

        let err = TrustAnchor::from_public_key_pem(LEAF_PEM).unwrap_err();
        assert!(matches!(err, Error::InvalidTrustAnchor(_)));
    }

    #[test]
    fn test_garbage_public_key_fails_resolution() {
        let anchor = TrustAnchor::PublicKey(PublicKeySpki::new(b"garbage".to_vec()));
        let err = resolve(&anchor, &VerificationOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidTrustAnchor(_)));
    }

    #[test]
    fn test_certificate_anchor_without_timestamp_verifier_fails_closed() {
        let anchor = TrustAnchor::from_certificate_pem(LEAF_PEM, CHAIN_PEM).unwrap();
        let err = resolve(&anchor, &VerificationOptions::default()).unwrap_err();
        assert!(matches!(err, Error::TimestampUnverified(_)));
    }

    #[test]
    fn test_certificate_anchor_carries_identity() {
        let anchor = TrustAnchor::from_certificate_pem(LEAF_PEM, CHAIN_PEM).unwrap();
        let options = VerificationOptions::default().skip_sct();
        let resolved = resolve(&anchor, &options).unwrap();
        assert_eq!(resolved.identity.as_deref(), Some("signer@example.com"));
        assert_eq!(resolved.issuer.as_deref(), Some("https://issuer.example.com"));
    }

    #[test]
    fn test_check_constraint() {
        let exact = IdentityMatcher::Exact("a@example.com".to_string());
        assert!(check_constraint(&exact, Some("a@example.com"), "identity").is_ok());
        assert!(check_constraint(&exact, Some("b@example.com"), "identity").is_err());
        assert!(check_constraint(&exact, None, "identity").is_err());

        let bad = IdentityMatcher::Regex("[".to_string());
        assert!(check_constraint(&bad, Some("a@example.com"), "identity").is_err());
    }
}
