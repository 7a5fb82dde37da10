//! Error types for attest-crypto

use thiserror::Error;

/// Errors that can occur in cryptographic operations
#[derive(Error, Debug)]
pub enum Error {
    /// A key pair could not be generated
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// A signature did not verify
    #[error("verification failed: {0}")]
    Verification(String),

    /// Key material is malformed or rejected by the backend
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The key or signature algorithm is not one this crate handles
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// DER encoding failed
    #[error("DER error: {0}")]
    Der(String),

    /// A certificate could not be parsed
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    /// The aws-lc-rs backend reported an unspecified failure
    #[error("crypto backend error")]
    Backend,
}

impl From<aws_lc_rs::error::Unspecified> for Error {
    fn from(_: aws_lc_rs::error::Unspecified) -> Self {
        Error::Backend
    }
}

impl From<aws_lc_rs::error::KeyRejected> for Error {
    fn from(e: aws_lc_rs::error::KeyRejected) -> Self {
        Error::InvalidKey(e.to_string())
    }
}

/// Result type for cryptographic operations
pub type Result<T> = std::result::Result<T, Error>;
