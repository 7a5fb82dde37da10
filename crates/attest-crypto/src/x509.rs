//! X.509 certificate utilities
//!
//! Parsing and inspection of the certificates that anchor keyless
//! attestations: signer identity, OIDC issuer, validity window and the
//! embedded public key.

use crate::encoding::PublicKeySpki;
use crate::error::{Error, Result};
use crate::signing::SigningScheme;
use crate::verification::VerificationKey;
use x509_cert::der::{Decode, Encode};
use x509_cert::spki::SubjectPublicKeyInfoOwned;
use x509_cert::Certificate;

use const_oid::db::rfc5912::{
    ECDSA_WITH_SHA_256, ECDSA_WITH_SHA_384, ID_EC_PUBLIC_KEY, RSA_ENCRYPTION, SECP_256_R_1,
    SECP_384_R_1, SHA_256_WITH_RSA_ENCRYPTION, SHA_384_WITH_RSA_ENCRYPTION,
    SHA_512_WITH_RSA_ENCRYPTION,
};
use const_oid::db::rfc8410::ID_ED_25519;
use const_oid::ObjectIdentifier;

/// OIDC issuer extension (legacy): 1.3.6.1.4.1.57264.1.1
///
/// The extension value is the issuer URL as raw bytes.
const OIDC_ISSUER_RAW_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.1");

/// OIDC issuer extension: 1.3.6.1.4.1.57264.1.8
///
/// The extension value is a DER-encoded UTF8String.
const OIDC_ISSUER_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.57264.1.8");

/// Information extracted from a certificate
#[derive(Debug, Clone)]
pub struct CertificateInfo {
    /// Identity from SAN extension (email or URI)
    pub identity: Option<String>,
    /// OIDC issuer URL from the issuer extensions
    pub issuer: Option<String>,
    /// Not valid before (Unix timestamp)
    pub not_before: i64,
    /// Not valid after (Unix timestamp)
    pub not_after: i64,
    /// Public key in DER-encoded SPKI format
    pub public_key: PublicKeySpki,
    /// Signing scheme derived from the public key algorithm
    pub signing_scheme: SigningScheme,
}

impl CertificateInfo {
    /// Build a verification key for signatures made by this certificate's key
    pub fn verification_key(&self) -> Result<VerificationKey> {
        Ok(VerificationKey::new(
            self.public_key.raw_key_bytes()?,
            self.signing_scheme,
        ))
    }
}

fn parse_certificate(cert_der: &[u8]) -> Result<Certificate> {
    Certificate::from_der(cert_der)
        .map_err(|e| Error::InvalidCertificate(format!("failed to parse certificate: {}", e)))
}

/// Parse certificate information from DER-encoded certificate
pub fn parse_certificate_info(cert_der: &[u8]) -> Result<CertificateInfo> {
    let cert = parse_certificate(cert_der)?;

    let validity = &cert.tbs_certificate.validity;
    let not_before = validity.not_before.to_unix_duration().as_secs() as i64;
    let not_after = validity.not_after.to_unix_duration().as_secs() as i64;

    let public_key_info = &cert.tbs_certificate.subject_public_key_info;
    let public_key_der = public_key_info
        .to_der()
        .map_err(|e| Error::InvalidCertificate(format!("failed to encode SPKI: {}", e)))?;

    let signing_scheme = determine_signing_scheme(public_key_info)?;
    let identity = extract_san_identity(&cert)?;
    let issuer = extract_oidc_issuer(&cert)?;

    Ok(CertificateInfo {
        identity,
        issuer,
        not_before,
        not_after,
        public_key: PublicKeySpki::new(public_key_der),
        signing_scheme,
    })
}

/// Determine the signing scheme from SubjectPublicKeyInfo
///
/// Keys with an algorithm or curve outside the supported set are rejected.
/// RSA keys are assumed to sign with PKCS#1 v1.5 and SHA-256, since the
/// padding cannot be known from the key alone.
pub fn determine_signing_scheme(spki: &SubjectPublicKeyInfoOwned) -> Result<SigningScheme> {
    let alg_oid = spki.algorithm.oid;

    if alg_oid == ID_EC_PUBLIC_KEY {
        let Some(params) = &spki.algorithm.parameters else {
            tracing::warn!("EC key missing curve parameters");
            return Err(Error::UnsupportedAlgorithm(
                "EC key without curve parameters".to_string(),
            ));
        };

        // params.value() holds the OID content bytes without tag and length
        let curve_oid = ObjectIdentifier::from_bytes(params.value())
            .map_err(|e| Error::InvalidKey(format!("failed to parse EC curve OID: {}", e)))?;

        return if curve_oid == SECP_256_R_1 {
            Ok(SigningScheme::EcdsaP256Sha256)
        } else if curve_oid == SECP_384_R_1 {
            Ok(SigningScheme::EcdsaP384Sha384)
        } else {
            tracing::warn!("Unsupported EC curve OID: {}", curve_oid);
            Err(Error::UnsupportedAlgorithm(format!("EC curve {}", curve_oid)))
        };
    }

    if alg_oid == RSA_ENCRYPTION {
        return Ok(SigningScheme::RsaPkcs1Sha256);
    }

    if alg_oid == ID_ED_25519 {
        return Ok(SigningScheme::Ed25519);
    }

    tracing::warn!("Unsupported public key algorithm OID: {}", alg_oid);
    Err(Error::UnsupportedAlgorithm(format!(
        "public key algorithm {}",
        alg_oid
    )))
}

/// Extract identity from Subject Alternative Name (SAN) extension
///
/// Returns the first email address or URI found.
pub fn extract_san_identity(cert: &Certificate) -> Result<Option<String>> {
    use x509_cert::ext::pkix::name::GeneralName;
    use x509_cert::ext::pkix::SubjectAltName;

    let san_opt: Option<(bool, SubjectAltName)> = cert
        .tbs_certificate
        .get()
        .map_err(|e| Error::InvalidCertificate(format!("failed to get SAN extension: {}", e)))?;

    let Some((_critical, san)) = san_opt else {
        return Ok(None);
    };

    for name in san.0.iter() {
        match name {
            GeneralName::Rfc822Name(email) => return Ok(Some(email.to_string())),
            GeneralName::UniformResourceIdentifier(uri) => return Ok(Some(uri.to_string())),
            _ => continue,
        }
    }

    Ok(None)
}

/// Extract the OIDC issuer from the certificate's issuer extensions
///
/// The DER-encoded 1.3.6.1.4.1.57264.1.8 extension wins over the legacy
/// raw 1.3.6.1.4.1.57264.1.1 one when both are present.
pub fn extract_oidc_issuer(cert: &Certificate) -> Result<Option<String>> {
    let Some(extensions) = &cert.tbs_certificate.extensions else {
        return Ok(None);
    };

    let mut legacy = None;
    for ext in extensions.iter() {
        let value = ext.extn_value.as_bytes();
        if ext.extn_id == OIDC_ISSUER_OID {
            let issuer = der::asn1::Utf8StringRef::from_der(value).map_err(|e| {
                Error::InvalidCertificate(format!("malformed OIDC issuer extension: {}", e))
            })?;
            return Ok(Some(issuer.to_string()));
        }
        if ext.extn_id == OIDC_ISSUER_RAW_OID {
            let issuer = std::str::from_utf8(value).map_err(|e| {
                Error::InvalidCertificate(format!("OIDC issuer is not UTF-8: {}", e))
            })?;
            legacy = Some(issuer.to_string());
        }
    }

    Ok(legacy)
}

/// Check whether a certificate is self-signed
///
/// A certificate is self-signed when its subject equals its issuer and its
/// signature verifies under its own public key.
pub fn is_self_signed(cert_der: &[u8]) -> Result<bool> {
    let cert = parse_certificate(cert_der)?;
    let tbs = &cert.tbs_certificate;

    if tbs.subject != tbs.issuer {
        return Ok(false);
    }

    let key_scheme = determine_signing_scheme(&tbs.subject_public_key_info)?;
    let scheme = signature_scheme(cert.signature_algorithm.oid, key_scheme)?;
    let key = VerificationKey::new(
        tbs.subject_public_key_info
            .subject_public_key
            .raw_bytes()
            .to_vec(),
        scheme,
    );

    let tbs_der = tbs
        .to_der()
        .map_err(|e| Error::InvalidCertificate(format!("failed to encode TBS: {}", e)))?;

    Ok(key.verify(&tbs_der, cert.signature.raw_bytes()).is_ok())
}

/// Map a certificate signature algorithm onto the scheme for the signer's key
fn signature_scheme(sig_oid: ObjectIdentifier, key_scheme: SigningScheme) -> Result<SigningScheme> {
    let scheme = match (sig_oid, key_scheme) {
        (oid, SigningScheme::EcdsaP256Sha256) if oid == ECDSA_WITH_SHA_256 => {
            SigningScheme::EcdsaP256Sha256
        }
        (oid, SigningScheme::EcdsaP384Sha384) if oid == ECDSA_WITH_SHA_384 => {
            SigningScheme::EcdsaP384Sha384
        }
        (oid, SigningScheme::Ed25519) if oid == ID_ED_25519 => SigningScheme::Ed25519,
        (oid, SigningScheme::RsaPkcs1Sha256) if oid == SHA_256_WITH_RSA_ENCRYPTION => {
            SigningScheme::RsaPkcs1Sha256
        }
        (oid, SigningScheme::RsaPkcs1Sha256) if oid == SHA_384_WITH_RSA_ENCRYPTION => {
            SigningScheme::RsaPkcs1Sha384
        }
        (oid, SigningScheme::RsaPkcs1Sha256) if oid == SHA_512_WITH_RSA_ENCRYPTION => {
            SigningScheme::RsaPkcs1Sha512
        }
        (oid, key) => {
            return Err(Error::UnsupportedAlgorithm(format!(
                "signature algorithm {} with {} key",
                oid, key
            )))
        }
    };
    Ok(scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::CertificateDer;

    const LEAF_PEM: &str = include_str!("../../attest-verify/test_data/leaf.pem");
    const ROOT_PEM: &str = include_str!("../../attest-verify/test_data/root.pem");
    const INTERMEDIATE_PEM: &str = include_str!("../../attest-verify/test_data/intermediate.pem");

    fn der(pem: &str) -> Vec<u8> {
        CertificateDer::from_pem(pem).unwrap().into_bytes()
    }

    #[test]
    fn test_parse_leaf_certificate() {
        let info = parse_certificate_info(&der(LEAF_PEM)).unwrap();
        assert_eq!(info.identity.as_deref(), Some("signer@example.com"));
        assert_eq!(info.issuer.as_deref(), Some("https://issuer.example.com"));
        assert_eq!(info.signing_scheme, SigningScheme::EcdsaP256Sha256);
        // 2024-01-01T00:00:00Z and 2124-01-01T00:00:00Z
        assert_eq!(info.not_before, 1_704_067_200);
        assert_eq!(info.not_after, 4_859_740_800);
        assert!(info.verification_key().is_ok());
    }

    #[test]
    fn test_ca_has_no_identity() {
        let info = parse_certificate_info(&der(ROOT_PEM)).unwrap();
        assert_eq!(info.identity, None);
        assert_eq!(info.issuer, None);
    }

    #[test]
    fn test_self_signed_detection() {
        assert!(is_self_signed(&der(ROOT_PEM)).unwrap());
        assert!(!is_self_signed(&der(INTERMEDIATE_PEM)).unwrap());
        assert!(!is_self_signed(&der(LEAF_PEM)).unwrap());
    }

    #[test]
    fn test_garbage_certificate() {
        assert!(matches!(
            parse_certificate_info(b"not a certificate"),
            Err(Error::InvalidCertificate(_))
        ));
        assert!(is_self_signed(b"not a certificate").is_err());
    }

    #[test]
    fn test_signature_scheme_mismatch() {
        assert!(signature_scheme(ECDSA_WITH_SHA_384, SigningScheme::EcdsaP256Sha256).is_err());
        assert_eq!(
            signature_scheme(SHA_384_WITH_RSA_ENCRYPTION, SigningScheme::RsaPkcs1Sha256).unwrap(),
            SigningScheme::RsaPkcs1Sha384
        );
    }
}
