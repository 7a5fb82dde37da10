//! The blob an attestation is verified against

use crate::error::{Error, Result};
use attest_types::Sha256Hash;
use std::fs::File;
use std::path::Path;

/// Source of the blob under test
///
/// A path is opened and digested only when claims are checked, so a caller
/// skipping the claim check may pass a path that does not exist or
/// [`Artifact::Absent`].
#[derive(Debug, Clone, Copy)]
pub enum Artifact<'a> {
    /// Blob contents in memory
    Bytes(&'a [u8]),
    /// Blob stored in a file
    Path(&'a Path),
    /// Pre-computed SHA-256 digest of the blob
    Digest(Sha256Hash),
    /// No blob supplied
    Absent,
}

impl Artifact<'_> {
    /// Compute the SHA-256 digest of the blob
    pub fn digest(&self) -> Result<Sha256Hash> {
        match self {
            Artifact::Bytes(bytes) => Ok(Sha256Hash::from_bytes(attest_crypto::sha256(bytes))),
            Artifact::Path(path) => {
                let file = File::open(path).map_err(|e| {
                    Error::BlobReadError(format!("failed to open {}: {}", path.display(), e))
                })?;
                let digest = attest_crypto::sha256_reader(file).map_err(|e| {
                    Error::BlobReadError(format!("failed to read {}: {}", path.display(), e))
                })?;
                Ok(Sha256Hash::from_bytes(digest))
            }
            Artifact::Digest(hash) => Ok(*hash),
            Artifact::Absent => Err(Error::BlobReadError("no blob supplied".to_string())),
        }
    }
}

impl<'a> From<&'a [u8]> for Artifact<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Artifact::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Artifact<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Artifact::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Artifact<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Artifact::Bytes(bytes)
    }
}

impl<'a> From<&'a Path> for Artifact<'a> {
    fn from(path: &'a Path) -> Self {
        Artifact::Path(path)
    }
}

impl From<Sha256Hash> for Artifact<'_> {
    fn from(hash: Sha256Hash) -> Self {
        Artifact::Digest(hash)
    }
}
