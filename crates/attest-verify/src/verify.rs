//! High-level verification API
//!
//! This module provides the main entry point for verifying an attestation
//! over a blob.

use crate::anchor::{ResolveContext, ResolvedAnchor, TrustAnchor};
use crate::artifact::Artifact;
use crate::claims::check_claims;
use crate::envelope::verify_envelope;
use crate::error::{Error, Result};
use crate::options::VerificationOptions;
use crate::oracle::{OracleError, TimestampVerifier, TransparencyLog};
use attest_types::{DsseEnvelope, Statement, IN_TOTO_PAYLOAD_TYPE};
use tokio_util::sync::CancellationToken;

/// Everything a single verification consumes
#[derive(Debug, Clone, Copy)]
pub struct VerificationRequest<'a> {
    /// DSSE envelope in its JSON wire form
    pub envelope: &'a [u8],
    /// Key material the signature must verify under
    pub anchor: &'a TrustAnchor,
    /// The blob the attestation is about
    pub artifact: Artifact<'a>,
    /// Caller expectations
    pub options: &'a VerificationOptions,
}

/// Result of a successful verification
#[derive(Debug, Clone)]
pub struct VerifiedAttestation {
    /// The statement carried by the envelope
    pub statement: Statement,
    /// Identity from the certificate, when a certificate anchor was used
    pub identity: Option<String>,
    /// OIDC issuer from the certificate, when a certificate anchor was used
    pub issuer: Option<String>,
    /// Index of the envelope signature that verified
    pub signature_index: usize,
}

/// A verifier for blob attestations
///
/// The verifier holds only its collaborators. When a collaborator is not
/// configured, the check it backs fails unless the options disable it.
#[derive(Default)]
pub struct Verifier {
    transparency_log: Option<Box<dyn TransparencyLog>>,
    timestamp_verifier: Option<Box<dyn TimestampVerifier>>,
}

impl Verifier {
    /// Create a verifier without collaborators
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a transparency log to confirm inclusion
    pub fn with_transparency_log(mut self, log: impl TransparencyLog + 'static) -> Self {
        self.transparency_log = Some(Box::new(log));
        self
    }

    /// Use a timestamp verifier to confirm certificate timestamps
    pub fn with_timestamp_verifier(mut self, verifier: impl TimestampVerifier + 'static) -> Self {
        self.timestamp_verifier = Some(Box::new(verifier));
        self
    }

    /// Verify an attestation over a blob
    ///
    /// In order to verify an attestation, we need to achieve the following:
    ///
    /// 1. Decode the DSSE envelope.
    /// 2. Resolve the trust anchor: validate the certificate chain, the
    ///    identity and issuer constraints and the certificate timestamp, or
    ///    accept the public key as given. Then confirm transparency log
    ///    inclusion.
    /// 3. Verify at least one envelope signature over its PAE.
    /// 4. Parse the payload as an in-toto statement.
    /// 5. If claims are checked, digest the blob and bind it to a subject,
    ///    and check the predicate type.
    ///
    /// Cancellation is observed before every step.
    pub fn verify(
        &self,
        request: &VerificationRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<VerifiedAttestation> {
        let options = request.options;

        // (1): Decode the envelope.
        check_cancelled(cancel, "decoding envelope")?;
        let envelope = DsseEnvelope::from_json(request.envelope)
            .map_err(|e| Error::MalformedEnvelope(decode_detail(e)))?;
        tracing::debug!(
            payload_type = %envelope.payload_type,
            signatures = envelope.signatures.len(),
            "Decoded envelope"
        );

        // (2): Resolve the trust anchor, then the transparency log.
        check_cancelled(cancel, "resolving trust anchor")?;
        let anchor = request.anchor.resolve(&ResolveContext {
            options,
            timestamps: self.timestamp_verifier.as_deref(),
            cancel,
        })?;
        tracing::debug!("Trust anchor resolved");

        check_cancelled(cancel, "checking transparency log")?;
        self.check_tlog(&envelope, &anchor, options, cancel)?;

        // (3): Verify the envelope signatures.
        check_cancelled(cancel, "verifying envelope")?;
        let signature_index = verify_envelope(&envelope, &anchor)?;

        // (4): Parse the statement.
        check_cancelled(cancel, "parsing statement")?;
        if envelope.payload_type != IN_TOTO_PAYLOAD_TYPE {
            return Err(Error::MalformedStatement(format!(
                "unsupported payload type {}, expected {}",
                envelope.payload_type, IN_TOTO_PAYLOAD_TYPE
            )));
        }
        let statement = Statement::from_slice(&envelope.payload)
            .map_err(|e| Error::MalformedStatement(decode_detail(e)))?;
        tracing::debug!(
            predicate_type = %statement.predicate_type,
            subjects = statement.subject.len(),
            "Parsed statement"
        );

        // (5): Bind the statement to the blob.
        if options.check_claims {
            check_cancelled(cancel, "digesting blob")?;
            let blob_digest = request.artifact.digest()?;

            check_cancelled(cancel, "checking claims")?;
            check_claims(&statement, &blob_digest, options.predicate_type.as_deref())?;
            tracing::debug!(digest = %blob_digest, "Claims checked");
        } else {
            tracing::debug!("Claim check skipped");
        }

        Ok(VerifiedAttestation {
            statement,
            identity: anchor.identity,
            issuer: anchor.issuer,
            signature_index,
        })
    }

    fn check_tlog(
        &self,
        envelope: &DsseEnvelope,
        anchor: &ResolvedAnchor,
        options: &VerificationOptions,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if options.ignore_tlog {
            tracing::debug!("Transparency log check skipped");
            return Ok(());
        }

        let Some(log) = &self.transparency_log else {
            return Err(Error::LogInclusionUnverified(
                "no transparency log configured".to_string(),
            ));
        };

        log.check_inclusion(envelope, anchor, cancel)
            .map_err(|e| match e {
                OracleError::Cancelled => {
                    Error::Cancelled("transparency log check cancelled".to_string())
                }
                OracleError::Rejected(reason) => Error::LogInclusionUnverified(reason),
            })?;

        tracing::debug!("Transparency log inclusion confirmed");
        Ok(())
    }
}

/// Strip the lower-crate prefix so the detail is not repeated
fn decode_detail(err: attest_types::Error) -> String {
    match err {
        attest_types::Error::MalformedEnvelope(detail)
        | attest_types::Error::MalformedStatement(detail) => detail,
        other => other.to_string(),
    }
}

fn check_cancelled(cancel: &CancellationToken, stage: &str) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled(format!("cancelled before {}", stage)));
    }
    Ok(())
}

/// Convenience function to verify an attestation over a blob
///
/// This uses a verifier without collaborators, so the options must skip the
/// transparency log check, and the timestamp check for certificate anchors.
pub fn verify_blob_attestation<'a>(
    envelope: &[u8],
    anchor: &TrustAnchor,
    artifact: impl Into<Artifact<'a>>,
    options: &VerificationOptions,
) -> Result<VerifiedAttestation> {
    let request = VerificationRequest {
        envelope,
        anchor,
        artifact: artifact.into(),
        options,
    };
    Verifier::new().verify(&request, &CancellationToken::new())
}
