//! Certificate chain-of-trust validation
//!
//! A caller supplies a leaf certificate and a chain `[intermediate..., last]`.
//! The last entry acts as the trust anchor and the entries before it as
//! intermediates. Under the default policy the anchor need not be
//! self-signed, so a chain ending in an intermediate pins trust at that
//! intermediate.

use crate::error::{Error, Result};
use crate::options::ChainRootPolicy;
use attest_crypto::CertificateDer;
use const_oid::db::rfc5912::ID_KP_CODE_SIGNING;
use rustls_pki_types::{CertificateDer as PkiCertificateDer, UnixTime};
use webpki::{anchor_from_trusted_cert, EndEntityCert, KeyUsage, ALL_VERIFICATION_ALGS};

/// Split a chain into its intermediates and its trust anchor
///
/// This is the single place that decides which certificate is trusted.
pub fn split_chain_at_root(
    chain: &[CertificateDer],
    policy: ChainRootPolicy,
) -> Result<(&[CertificateDer], &CertificateDer)> {
    let Some((root, intermediates)) = chain.split_last() else {
        return Err(Error::ChainInvalid(
            "no certificates in chain".to_string(),
        ));
    };

    if policy == ChainRootPolicy::RequireSelfSigned {
        let self_signed = attest_crypto::is_self_signed(root.as_bytes())
            .map_err(|e| Error::ChainInvalid(format!("failed to inspect root: {}", e)))?;
        if !self_signed {
            return Err(Error::ChainInvalid(
                "last certificate in chain is not self-signed".to_string(),
            ));
        }
    }

    Ok((intermediates, root))
}

/// Verify the leaf certificate chains to the anchor at the given time
///
/// This checks signature linkage and validity windows of every certificate
/// on the path. Certificates below the anchor that carry an extended key
/// usage extension must list CODE_SIGNING; those without one allow any usage.
pub fn verify_certificate_chain(
    leaf: &CertificateDer,
    chain: &[CertificateDer],
    policy: ChainRootPolicy,
    validation_time: i64,
) -> Result<()> {
    let (intermediates, root) = split_chain_at_root(chain, policy)?;

    let validation_time = u64::try_from(validation_time).map_err(|_| {
        Error::ChainInvalid(format!("validation time {} is before the epoch", validation_time))
    })?;

    let root_der = PkiCertificateDer::from(root.as_bytes());
    let trust_anchor = anchor_from_trusted_cert(&root_der)
        .map_err(|e| Error::ChainInvalid(format!("failed to create trust anchor: {}", e)))?;

    let intermediate_certs: Vec<PkiCertificateDer<'_>> = intermediates
        .iter()
        .map(|c| PkiCertificateDer::from(c.as_bytes()))
        .collect();

    let leaf_der = PkiCertificateDer::from(leaf.as_bytes());
    let end_entity_cert = EndEntityCert::try_from(&leaf_der)
        .map_err(|e| Error::ChainInvalid(format!("failed to parse leaf certificate: {}", e)))?;

    let verification_time =
        UnixTime::since_unix_epoch(std::time::Duration::from_secs(validation_time));

    // No revocation checking
    end_entity_cert
        .verify_for_usage(
            ALL_VERIFICATION_ALGS,
            &[trust_anchor],
            &intermediate_certs,
            verification_time,
            KeyUsage::required_if_present(ID_KP_CODE_SIGNING.as_bytes()),
            None,
            None,
        )
        .map_err(|e| Error::ChainInvalid(format!("certificate chain validation failed: {}", e)))?;

    tracing::debug!(
        intermediates = intermediates.len(),
        "Certificate chain validated successfully with CODE_SIGNING EKU"
    );

    Ok(())
}
