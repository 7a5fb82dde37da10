//! Core types for blob attestation verification
//!
//! This crate provides the wire-level data structures the verifier works on:
//! the DSSE envelope that carries a signed payload, and the in-toto statement
//! that payload decodes to.

pub mod dsse;
pub mod encoding;
pub mod error;
pub mod intoto;

pub(crate) use encoding::base64_bytes;

pub use dsse::{pae, DsseEnvelope, DsseSignature};
pub use encoding::{decode_base64, encode_base64, Sha256Hash};
pub use error::{Error, Result};
pub use intoto::{DigestSet, Statement, Subject, IN_TOTO_PAYLOAD_TYPE, STATEMENT_TYPE_V1};
