//! Type-safe wrappers for encoded key and certificate material
//!
//! These newtypes make it clear what encoding format data is in, preventing
//! confusion between DER, PEM, and raw bytes.

use crate::error::{Error, Result};
use crate::signing::SigningScheme;
use crate::x509::determine_signing_scheme;
use der::Decode;
use spki::{SubjectPublicKeyInfoOwned, SubjectPublicKeyInfoRef};

/// A DER-encoded X.509 certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateDer(Vec<u8>);

impl CertificateDer {
    /// Create from DER bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Create from a single PEM-encoded certificate
    pub fn from_pem(pem_str: &str) -> Result<Self> {
        let parsed = pem::parse(pem_str)
            .map_err(|e| Error::InvalidCertificate(format!("failed to parse PEM: {}", e)))?;

        Self::from_pem_block(parsed)
    }

    /// Parse every certificate in a PEM bundle, preserving order
    ///
    /// Any block that is not a `CERTIFICATE` makes the whole bundle invalid.
    /// An input with no PEM blocks at all yields an empty list.
    pub fn from_pem_bundle(pem_str: &str) -> Result<Vec<Self>> {
        let blocks = pem::parse_many(pem_str)
            .map_err(|e| Error::InvalidCertificate(format!("failed to parse PEM: {}", e)))?;

        blocks.into_iter().map(Self::from_pem_block).collect()
    }

    fn from_pem_block(block: pem::Pem) -> Result<Self> {
        if block.tag() != "CERTIFICATE" {
            return Err(Error::InvalidCertificate(format!(
                "expected CERTIFICATE PEM block, got {}",
                block.tag()
            )));
        }

        Ok(Self::new(block.into_contents()))
    }

    /// Get the underlying DER bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Convert to owned DER bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for CertificateDer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for CertificateDer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// A DER-encoded SubjectPublicKeyInfo (SPKI)
///
/// This is the standard format for public keys that includes the algorithm identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeySpki(Vec<u8>);

impl PublicKeySpki {
    /// Create from DER bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Create from PEM-encoded public key
    pub fn from_pem(pem_str: &str) -> Result<Self> {
        let parsed = pem::parse(pem_str)
            .map_err(|e| Error::InvalidKey(format!("failed to parse PEM: {}", e)))?;

        if parsed.tag() != "PUBLIC KEY" {
            return Err(Error::InvalidKey(format!(
                "expected PUBLIC KEY PEM block, got {}",
                parsed.tag()
            )));
        }

        Ok(Self::new(parsed.into_contents()))
    }

    /// Get the underlying DER bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Extract the raw public key bytes (without the algorithm identifier)
    ///
    /// For EC keys this is the uncompressed point, for Ed25519 the 32-byte
    /// key and for RSA the PKCS#1 `RSAPublicKey`, which is what aws-lc-rs
    /// verification expects.
    pub fn raw_key_bytes(&self) -> Result<Vec<u8>> {
        let spki = SubjectPublicKeyInfoRef::try_from(self.as_bytes())
            .map_err(|e| Error::InvalidKey(format!("failed to parse SPKI: {}", e)))?;

        Ok(spki.subject_public_key.raw_bytes().to_vec())
    }

    /// Determine the signing scheme from the SPKI algorithm
    pub fn signing_scheme(&self) -> Result<SigningScheme> {
        let spki = SubjectPublicKeyInfoOwned::from_der(self.as_bytes())
            .map_err(|e| Error::InvalidKey(format!("failed to parse SPKI: {}", e)))?;

        determine_signing_scheme(&spki)
    }
}

impl From<Vec<u8>> for PublicKeySpki {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for PublicKeySpki {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
