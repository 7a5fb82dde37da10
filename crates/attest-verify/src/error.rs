//! Error types for attest-verify

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during attestation verification
///
/// Every failure of the pipeline is exactly one of these variants. The
/// string carries human-readable detail only; match on the variant (or on
/// [`Error::reason`]) to decide what went wrong.
#[derive(Error, Debug)]
pub enum Error {
    /// The envelope bytes are not a valid DSSE envelope
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// No signature in the envelope verifies under the trust anchor
    #[error("signature invalid: {0}")]
    SignatureInvalid(String),

    /// The envelope payload is not a valid in-toto statement
    #[error("malformed statement: {0}")]
    MalformedStatement(String),

    /// The statement has no subjects
    #[error("subject missing: {0}")]
    SubjectMissing(String),

    /// No subject carries a SHA-256 digest
    #[error("digest missing: {0}")]
    DigestMissing(String),

    /// No subject's SHA-256 digest equals the blob digest
    #[error("digest mismatch: {0}")]
    DigestMismatch(String),

    /// The statement's predicate type is not the expected one
    #[error("predicate type mismatch: {0}")]
    PredicateTypeMismatch(String),

    /// The certificate chain does not validate
    #[error("certificate chain invalid: {0}")]
    ChainInvalid(String),

    /// The signer identity does not satisfy the identity constraint
    #[error("identity mismatch: {0}")]
    IdentityMismatch(String),

    /// The OIDC issuer does not satisfy the issuer constraint
    #[error("issuer mismatch: {0}")]
    IssuerMismatch(String),

    /// The signed certificate timestamp could not be confirmed
    #[error("timestamp unverified: {0}")]
    TimestampUnverified(String),

    /// Transparency log inclusion could not be confirmed
    #[error("log inclusion unverified: {0}")]
    LogInclusionUnverified(String),

    /// The blob could not be read
    #[error("blob read error: {0}")]
    BlobReadError(String),

    /// Verification was cancelled before it completed
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Key or certificate material supplied by the caller cannot be parsed
    #[error("invalid trust anchor: {0}")]
    InvalidTrustAnchor(String),
}

/// The reason a verification failed, without detail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    MalformedEnvelope,
    SignatureInvalid,
    MalformedStatement,
    SubjectMissing,
    DigestMissing,
    DigestMismatch,
    PredicateTypeMismatch,
    ChainInvalid,
    IdentityMismatch,
    IssuerMismatch,
    TimestampUnverified,
    LogInclusionUnverified,
    BlobReadError,
    Cancelled,
    InvalidTrustAnchor,
}

impl FailureReason {
    /// Get the name of this reason
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::MalformedEnvelope => "MalformedEnvelope",
            FailureReason::SignatureInvalid => "SignatureInvalid",
            FailureReason::MalformedStatement => "MalformedStatement",
            FailureReason::SubjectMissing => "SubjectMissing",
            FailureReason::DigestMissing => "DigestMissing",
            FailureReason::DigestMismatch => "DigestMismatch",
            FailureReason::PredicateTypeMismatch => "PredicateTypeMismatch",
            FailureReason::ChainInvalid => "ChainInvalid",
            FailureReason::IdentityMismatch => "IdentityMismatch",
            FailureReason::IssuerMismatch => "IssuerMismatch",
            FailureReason::TimestampUnverified => "TimestampUnverified",
            FailureReason::LogInclusionUnverified => "LogInclusionUnverified",
            FailureReason::BlobReadError => "BlobReadError",
            FailureReason::Cancelled => "Cancelled",
            FailureReason::InvalidTrustAnchor => "InvalidTrustAnchor",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Get the failure reason for this error
    pub fn reason(&self) -> FailureReason {
        match self {
            Error::MalformedEnvelope(_) => FailureReason::MalformedEnvelope,
            Error::SignatureInvalid(_) => FailureReason::SignatureInvalid,
            Error::MalformedStatement(_) => FailureReason::MalformedStatement,
            Error::SubjectMissing(_) => FailureReason::SubjectMissing,
            Error::DigestMissing(_) => FailureReason::DigestMissing,
            Error::DigestMismatch(_) => FailureReason::DigestMismatch,
            Error::PredicateTypeMismatch(_) => FailureReason::PredicateTypeMismatch,
            Error::ChainInvalid(_) => FailureReason::ChainInvalid,
            Error::IdentityMismatch(_) => FailureReason::IdentityMismatch,
            Error::IssuerMismatch(_) => FailureReason::IssuerMismatch,
            Error::TimestampUnverified(_) => FailureReason::TimestampUnverified,
            Error::LogInclusionUnverified(_) => FailureReason::LogInclusionUnverified,
            Error::BlobReadError(_) => FailureReason::BlobReadError,
            Error::Cancelled(_) => FailureReason::Cancelled,
            Error::InvalidTrustAnchor(_) => FailureReason::InvalidTrustAnchor,
        }
    }
}

/// Result type for verification operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_and_display() {
        let err = Error::DigestMismatch("expected abc".to_string());
        assert_eq!(err.reason(), FailureReason::DigestMismatch);
        assert_eq!(err.to_string(), "digest mismatch: expected abc");
        assert_eq!(err.reason().to_string(), "DigestMismatch");
    }

    #[test]
    fn test_reason_serializes_by_name() {
        let json = serde_json::to_string(&FailureReason::LogInclusionUnverified).unwrap();
        assert_eq!(json, "\"LogInclusionUnverified\"");
    }
}
