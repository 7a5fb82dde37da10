//! External collaborators consulted during verification
//!
//! Transparency-log inclusion and signed certificate timestamps are checked
//! by services outside this crate. The verifier only needs a yes/no answer
//! from each, so they are modelled as small traits.

use crate::anchor::ResolvedAnchor;
use attest_crypto::CertificateDer;
use attest_types::DsseEnvelope;
use tokio_util::sync::CancellationToken;

/// Failure reported by a collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// The collaborator observed cancellation and stopped
    #[error("cancelled")]
    Cancelled,
    /// The collaborator could not confirm the evidence
    #[error("{0}")]
    Rejected(String),
}

/// Confirms that an attestation was recorded in a transparency log
pub trait TransparencyLog: Send + Sync {
    /// Check that `envelope`, signed under `anchor`, is included in the log
    fn check_inclusion(
        &self,
        envelope: &DsseEnvelope,
        anchor: &ResolvedAnchor,
        cancel: &CancellationToken,
    ) -> Result<(), OracleError>;
}

/// Confirms the signed certificate timestamp embedded in a leaf certificate
pub trait TimestampVerifier: Send + Sync {
    /// Check the timestamp evidence for `leaf`
    fn check_timestamp(
        &self,
        leaf: &CertificateDer,
        cancel: &CancellationToken,
    ) -> Result<(), OracleError>;
}
