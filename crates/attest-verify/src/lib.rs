//! Verification of detached attestations over blobs
//!
//! An attestation is an in-toto statement wrapped in a DSSE envelope. This
//! crate checks that the envelope was signed by a trusted key or certificate,
//! that the statement names the blob under test by its SHA-256 digest, and
//! that the statement's predicate type is the one the caller expects.
//!
//! # Example
//!
//! ```no_run
//! use attest_verify::{verify_blob_attestation, TrustAnchor, VerificationOptions};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let envelope = std::fs::read("attestation.json")?;
//! let key_pem = std::fs::read_to_string("cosign.pub")?;
//! let blob = std::fs::read("blob")?;
//!
//! let anchor = TrustAnchor::from_public_key_pem(&key_pem)?;
//! let options = VerificationOptions::default()
//!     .skip_tlog()
//!     .require_predicate_type("slsaprovenance");
//!
//! let verified = verify_blob_attestation(&envelope, &anchor, &blob, &options)?;
//! println!("verified {}", verified.statement.predicate_type);
//! # Ok(())
//! # }
//! ```

pub mod anchor;
pub mod artifact;
pub mod chain;
pub mod claims;
pub mod envelope;
pub mod error;
pub mod options;
pub mod oracle;
pub mod verify;

pub use anchor::{ResolveContext, ResolvedAnchor, TrustAnchor};
pub use artifact::Artifact;
pub use chain::{split_chain_at_root, verify_certificate_chain};
pub use claims::{check_claims, predicate_type_matches, predicate_type_uri};
pub use envelope::verify_envelope;
pub use error::{Error, FailureReason, Result};
pub use options::{ChainRootPolicy, IdentityMatcher, VerificationOptions};
pub use oracle::{OracleError, TimestampVerifier, TransparencyLog};
pub use verify::{verify_blob_attestation, VerificationRequest, VerifiedAttestation, Verifier};

pub use attest_crypto::{CertificateDer, PublicKeySpki};
pub use attest_types::{DsseEnvelope, Sha256Hash, Statement};
pub use tokio_util::sync::CancellationToken;
