//! Error types for attest-types

use thiserror::Error;

/// Errors that can occur in attest-types
#[derive(Error, Debug)]
pub enum Error {
    /// The envelope is not a structurally valid DSSE envelope
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The payload is not a structurally valid in-toto statement
    #[error("malformed statement: {0}")]
    MalformedStatement(String),

    /// Hex or base64 data could not be decoded
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for attest-types operations
pub type Result<T> = std::result::Result<T, Error>;
