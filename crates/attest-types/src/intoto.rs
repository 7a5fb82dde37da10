//! In-toto attestation types
//!
//! In-toto provides a framework for securing software supply chain integrity.
//! This module defines the statement carried inside a DSSE envelope.
//!
//! Specification: https://github.com/in-toto/attestation/blob/main/spec/v1/statement.md

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Payload type identifying an in-toto statement inside a DSSE envelope
pub const IN_TOTO_PAYLOAD_TYPE: &str = "application/vnd.in-toto+json";

/// Statement type for in-toto v1 statements
pub const STATEMENT_TYPE_V1: &str = "https://in-toto.io/Statement/v1";

/// In-toto Statement
///
/// An in-toto statement binds a predicate to a set of subjects (artifacts).
/// A statement with no subjects, or with subjects that carry no digests,
/// still parses: whether such a statement is acceptable is for the claim
/// check to decide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    /// Type identifier for the statement
    #[serde(rename = "_type")]
    pub type_: String,
    /// Subjects (artifacts) being attested about
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: Vec<Subject>,
    /// Type of the predicate (e.g., "https://slsa.dev/provenance/v1")
    pub predicate_type: String,
    /// The attestation content, opaque to this crate
    #[serde(default)]
    pub predicate: serde_json::Value,
}

/// Subject of an in-toto statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Name of the artifact (e.g., file name, package name)
    #[serde(default)]
    pub name: String,
    /// Cryptographic digest(s) of the artifact
    #[serde(default, deserialize_with = "null_as_default")]
    pub digest: DigestSet,
}

/// Digest set of a subject, keyed by algorithm name
///
/// Values are hex encoded. Any algorithm name is accepted; `sha256` is the
/// one the verifier binds blobs against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DigestSet(BTreeMap<String, String>);

impl DigestSet {
    /// Create an empty digest set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the digest for an algorithm
    pub fn insert(&mut self, algorithm: impl Into<String>, hex_digest: impl Into<String>) {
        self.0.insert(algorithm.into(), hex_digest.into());
    }

    /// Builder form of [`DigestSet::insert`]
    pub fn with(mut self, algorithm: impl Into<String>, hex_digest: impl Into<String>) -> Self {
        self.insert(algorithm, hex_digest);
        self
    }

    /// Get the digest for an algorithm
    pub fn get(&self, algorithm: &str) -> Option<&str> {
        self.0.get(algorithm).map(String::as_str)
    }

    /// Get the SHA-256 digest, if present
    pub fn sha256(&self) -> Option<&str> {
        self.get("sha256")
    }

    /// Whether no digests are present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Read an explicit `null` as the empty value, same as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Statement {
    /// Parse a statement from a decoded envelope payload
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::MalformedStatement(e.to_string()))
    }

    /// Iterate over the SHA-256 digests of all subjects that carry one
    pub fn subject_sha256_digests(&self) -> impl Iterator<Item = &str> {
        self.subject.iter().filter_map(Subject::sha256)
    }
}

impl Subject {
    /// Get the subject's SHA-256 digest, if present
    pub fn sha256(&self) -> Option<&str> {
        self.digest.sha256()
    }
}
