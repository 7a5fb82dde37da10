//! Cryptographic primitives for blob attestation verification
//!
//! This crate provides digests, signature verification, key pairs and X.509
//! inspection using aws-lc-rs as the cryptographic backend and the RustCrypto
//! `x509-cert` family for certificate parsing.

pub mod encoding;
pub mod error;
pub mod hash;
pub mod signing;
pub mod verification;
pub mod x509;

pub use encoding::{CertificateDer, PublicKeySpki};
pub use error::{Error, Result};
pub use hash::{sha256, sha256_hex, sha256_reader, Sha256Hasher};
pub use signing::{KeyPair, Signature, SigningScheme};
pub use verification::VerificationKey;
pub use x509::{is_self_signed, parse_certificate_info, CertificateInfo};
