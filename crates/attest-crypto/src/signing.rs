//! Signing schemes and key pairs
//!
//! The verifier itself never signs. Key pairs exist so attestations can be
//! produced for tests and local tooling with exactly the schemes the
//! verifier accepts.

use crate::error::{Error, Result};
use aws_lc_rs::{
    rand::SystemRandom,
    signature::{
        EcdsaKeyPair, EcdsaSigningAlgorithm, Ed25519KeyPair, KeyPair as _,
        ECDSA_P256_SHA256_ASN1_SIGNING, ECDSA_P384_SHA384_ASN1_SIGNING,
    },
};
use const_oid::db::rfc5912::{ID_EC_PUBLIC_KEY, SECP_256_R_1, SECP_384_R_1};
use const_oid::db::rfc8410::ID_ED_25519;
use const_oid::ObjectIdentifier;

/// A raw signature as produced by [`KeyPair::sign`]
///
/// ECDSA signatures are ASN.1 DER encoded, Ed25519 signatures are 64 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Get the raw signature bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume and return the inner bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Signature schemes the verifier accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningScheme {
    /// ECDSA P-256 with SHA-256
    EcdsaP256Sha256,
    /// ECDSA P-384 with SHA-384
    EcdsaP384Sha384,
    /// Ed25519
    Ed25519,
    /// RSA PKCS#1 v1.5 with SHA-256
    RsaPkcs1Sha256,
    /// RSA PKCS#1 v1.5 with SHA-384
    RsaPkcs1Sha384,
    /// RSA PKCS#1 v1.5 with SHA-512
    RsaPkcs1Sha512,
}

impl std::fmt::Display for SigningScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SigningScheme::EcdsaP256Sha256 => "ecdsa-p256-sha256",
            SigningScheme::EcdsaP384Sha384 => "ecdsa-p384-sha384",
            SigningScheme::Ed25519 => "ed25519",
            SigningScheme::RsaPkcs1Sha256 => "rsa-pkcs1-sha256",
            SigningScheme::RsaPkcs1Sha384 => "rsa-pkcs1-sha384",
            SigningScheme::RsaPkcs1Sha512 => "rsa-pkcs1-sha512",
        };
        f.write_str(name)
    }
}

/// A key pair for producing attestation signatures
pub enum KeyPair {
    /// ECDSA P-256 key pair
    EcdsaP256(EcdsaKeyPair),
    /// ECDSA P-384 key pair
    EcdsaP384(EcdsaKeyPair),
    /// Ed25519 key pair
    Ed25519(Ed25519KeyPair),
}

fn generate_ecdsa(alg: &'static EcdsaSigningAlgorithm, curve: &str) -> Result<EcdsaKeyPair> {
    let pkcs8 = EcdsaKeyPair::generate_pkcs8(alg, &SystemRandom::new())
        .map_err(|_| Error::KeyGeneration(format!("{} key", curve)))?;
    Ok(EcdsaKeyPair::from_pkcs8(alg, pkcs8.as_ref())?)
}

impl KeyPair {
    /// Generate a new ECDSA P-256 key pair
    pub fn generate_ecdsa_p256() -> Result<Self> {
        generate_ecdsa(&ECDSA_P256_SHA256_ASN1_SIGNING, "P-256").map(KeyPair::EcdsaP256)
    }

    /// Generate a new ECDSA P-384 key pair
    pub fn generate_ecdsa_p384() -> Result<Self> {
        generate_ecdsa(&ECDSA_P384_SHA384_ASN1_SIGNING, "P-384").map(KeyPair::EcdsaP384)
    }

    /// Generate a new Ed25519 key pair
    pub fn generate_ed25519() -> Result<Self> {
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&SystemRandom::new())
            .map_err(|_| Error::KeyGeneration("Ed25519 key".to_string()))?;
        Ok(KeyPair::Ed25519(Ed25519KeyPair::from_pkcs8(pkcs8.as_ref())?))
    }

    /// Raw public key bytes, as found inside the SPKI bit string
    pub fn public_key_bytes(&self) -> &[u8] {
        match self {
            KeyPair::EcdsaP256(kp) | KeyPair::EcdsaP384(kp) => kp.public_key().as_ref(),
            KeyPair::Ed25519(kp) => kp.public_key().as_ref(),
        }
    }

    /// The scheme signatures from this key pair verify under
    pub fn default_scheme(&self) -> SigningScheme {
        match self {
            KeyPair::EcdsaP256(_) => SigningScheme::EcdsaP256Sha256,
            KeyPair::EcdsaP384(_) => SigningScheme::EcdsaP384Sha384,
            KeyPair::Ed25519(_) => SigningScheme::Ed25519,
        }
    }

    /// Sign data with this key pair
    pub fn sign(&self, data: &[u8]) -> Result<Signature> {
        let bytes = match self {
            KeyPair::EcdsaP256(kp) | KeyPair::EcdsaP384(kp) => {
                kp.sign(&SystemRandom::new(), data)?.as_ref().to_vec()
            }
            KeyPair::Ed25519(kp) => kp.sign(data).as_ref().to_vec(),
        };
        Ok(Signature(bytes))
    }

    /// Public key as a DER-encoded SubjectPublicKeyInfo
    pub fn public_key_to_der(&self) -> Result<Vec<u8>> {
        let (algorithm, curve) = match self {
            KeyPair::EcdsaP256(_) => (ID_EC_PUBLIC_KEY, Some(SECP_256_R_1)),
            KeyPair::EcdsaP384(_) => (ID_EC_PUBLIC_KEY, Some(SECP_384_R_1)),
            KeyPair::Ed25519(_) => (ID_ED_25519, None),
        };
        encode_spki(algorithm, curve, self.public_key_bytes())
    }

    /// Public key as a `PUBLIC KEY` PEM block
    pub fn public_key_to_pem(&self) -> Result<String> {
        let der = self.public_key_to_der()?;
        Ok(pem::encode(&pem::Pem::new("PUBLIC KEY", der)))
    }
}

fn encode_spki(
    algorithm: ObjectIdentifier,
    curve: Option<ObjectIdentifier>,
    key: &[u8],
) -> Result<Vec<u8>> {
    use der::asn1::BitString;
    use der::Encode;
    use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

    let parameters = curve
        .map(|oid| der::Any::encode_from(&oid))
        .transpose()
        .map_err(|e| Error::Der(e.to_string()))?;

    let spki = SubjectPublicKeyInfoOwned {
        algorithm: AlgorithmIdentifierOwned {
            oid: algorithm,
            parameters,
        },
        subject_public_key: BitString::from_bytes(key).map_err(|e| Error::Der(e.to_string()))?,
    };

    spki.to_der().map_err(|e| Error::Der(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ecdsa_p256_public_key_is_uncompressed_point() {
        let kp = KeyPair::generate_ecdsa_p256().unwrap();
        let bytes = kp.public_key_bytes();
        assert_eq!(bytes.len(), 65);
        assert_eq!(bytes[0], 0x04);
    }

    #[test]
    fn test_ed25519_sizes() {
        let kp = KeyPair::generate_ed25519().unwrap();
        assert_eq!(kp.public_key_bytes().len(), 32);
        assert_eq!(kp.sign(b"data").unwrap().as_bytes().len(), 64);
    }

    #[test]
    fn test_public_key_pem_round_trips_scheme() {
        for kp in [
            KeyPair::generate_ecdsa_p256().unwrap(),
            KeyPair::generate_ecdsa_p384().unwrap(),
            KeyPair::generate_ed25519().unwrap(),
        ] {
            let pem = kp.public_key_to_pem().unwrap();
            assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----"));

            let spki = crate::PublicKeySpki::from_pem(&pem).unwrap();
            assert_eq!(spki.signing_scheme().unwrap(), kp.default_scheme());
        }
    }

    #[test]
    fn test_scheme_display() {
        assert_eq!(SigningScheme::EcdsaP256Sha256.to_string(), "ecdsa-p256-sha256");
        assert_eq!(SigningScheme::Ed25519.to_string(), "ed25519");
    }
}
