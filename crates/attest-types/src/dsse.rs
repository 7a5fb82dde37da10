//! Dead Simple Signing Envelope (DSSE) types
//!
//! DSSE is a signature envelope format used for signing arbitrary payloads.
//! Specification: https://github.com/secure-systems-lab/dsse
//!
//! On the wire `payload` and each `sig` are base64; in memory they are kept
//! decoded, so a successfully parsed envelope never needs a second decoding
//! step before verification.

use crate::base64_bytes;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A DSSE envelope containing a signed payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsseEnvelope {
    /// Type URI of the payload
    pub payload_type: String,
    /// Decoded payload bytes
    #[serde(with = "base64_bytes")]
    pub payload: Vec<u8>,
    /// Signatures over the PAE (Pre-Authentication Encoding)
    pub signatures: Vec<DsseSignature>,
}

/// A signature in a DSSE envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsseSignature {
    /// Key ID (optional hint for key lookup, never required to match)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub keyid: String,
    /// Decoded signature bytes
    #[serde(with = "base64_bytes")]
    pub sig: Vec<u8>,
}

impl DsseEnvelope {
    /// Create a new DSSE envelope
    pub fn new(payload_type: String, payload: Vec<u8>, signatures: Vec<DsseSignature>) -> Self {
        Self {
            payload_type,
            payload,
            signatures,
        }
    }

    /// Decode an envelope from its JSON wire form
    ///
    /// Fails with [`Error::MalformedEnvelope`] when the input is not JSON,
    /// lacks a required field, carries invalid base64, or has no signatures.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let envelope: DsseEnvelope = serde_json::from_slice(bytes)
            .map_err(|e| Error::MalformedEnvelope(e.to_string()))?;

        if envelope.signatures.is_empty() {
            return Err(Error::MalformedEnvelope(
                "envelope has no signatures".to_string(),
            ));
        }

        Ok(envelope)
    }

    /// Encode the envelope to its JSON wire form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Get the Pre-Authentication Encoding (PAE) of this envelope
    ///
    /// This, not the raw payload, is what every signature covers.
    pub fn pae(&self) -> Vec<u8> {
        pae(&self.payload_type, &self.payload)
    }
}

/// Compute the Pre-Authentication Encoding (PAE)
///
/// Format: `DSSEv1 <len(type)> <type> <len(body)> <body>`, lengths in ASCII
/// decimal.
pub fn pae(payload_type: &str, payload: &[u8]) -> Vec<u8> {
    let header = format!(
        "DSSEv1 {} {} {} ",
        payload_type.len(),
        payload_type,
        payload.len()
    );

    let mut result = Vec::with_capacity(header.len() + payload.len());
    result.extend_from_slice(header.as_bytes());
    result.extend_from_slice(payload);
    result
}
