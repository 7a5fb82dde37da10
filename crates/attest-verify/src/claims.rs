//! Binding a verified statement to the blob under test

use crate::error::{Error, Result};
use attest_types::{Sha256Hash, Statement};

/// Well-known predicate type short names and the URIs they stand for
const PREDICATE_TYPE_ALIASES: &[(&str, &str)] = &[
    ("custom", "https://cosign.sigstore.dev/attestation/v1"),
    ("slsaprovenance", "https://slsa.dev/provenance/v0.2"),
    ("slsaprovenance02", "https://slsa.dev/provenance/v0.2"),
    ("slsaprovenance1", "https://slsa.dev/provenance/v1"),
    ("spdx", "https://spdx.dev/Document"),
    ("spdxjson", "https://spdx.dev/Document"),
    ("cyclonedx", "https://cyclonedx.org/bom"),
    ("link", "https://in-toto.io/Link/v1"),
    ("vuln", "https://cosign.sigstore.dev/attestation/vuln/v1"),
    ("openvex", "https://openvex.dev/ns"),
];

/// Look up the URI a predicate type short name stands for
pub fn predicate_type_uri(short_name: &str) -> Option<&'static str> {
    PREDICATE_TYPE_ALIASES
        .iter()
        .find(|(name, _)| *name == short_name)
        .map(|(_, uri)| *uri)
}

/// Check whether a statement's predicate type satisfies an expectation
///
/// The expectation matches when it equals the predicate type, or when it is
/// a short name whose URI equals the predicate type.
pub fn predicate_type_matches(actual: &str, expected: &str) -> bool {
    actual == expected || predicate_type_uri(expected) == Some(actual)
}

/// Check the statement's claims against the blob digest
///
/// The predicate type is checked first, so a wrong predicate type is
/// reported as such whatever the subjects say. An empty expectation does not
/// constrain the predicate type. Subject digests are compared
/// case-insensitively and every subject is considered before failing.
pub fn check_claims(
    statement: &Statement,
    blob_digest: &Sha256Hash,
    expected_predicate_type: Option<&str>,
) -> Result<()> {
    if let Some(expected) = expected_predicate_type.filter(|s| !s.is_empty()) {
        if !predicate_type_matches(&statement.predicate_type, expected) {
            return Err(Error::PredicateTypeMismatch(format!(
                "expected {}, got {}",
                expected, statement.predicate_type
            )));
        }
    }

    if statement.subject.is_empty() {
        return Err(Error::SubjectMissing(
            "statement has no subjects".to_string(),
        ));
    }

    let blob_hex = blob_digest.to_hex();
    let mut any_sha256 = false;
    for digest in statement.subject_sha256_digests() {
        any_sha256 = true;
        if digest.eq_ignore_ascii_case(&blob_hex) {
            return Ok(());
        }
    }

    if !any_sha256 {
        return Err(Error::DigestMissing(format!(
            "none of {} subject(s) has a sha256 digest",
            statement.subject.len()
        )));
    }

    Err(Error::DigestMismatch(format!(
        "no subject sha256 digest equals blob digest {}",
        blob_hex
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_types::{DigestSet, Subject, STATEMENT_TYPE_V1};

    const FOO_SHA256: &str = "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae";
    const BAR_SHA256: &str = "fcde2b2edba56bf408601fb721fe9b5c338d10ee429ea04fae5511b68fbf8fb9";

    fn statement(predicate_type: &str, subjects: Vec<DigestSet>) -> Statement {
        Statement {
            type_: STATEMENT_TYPE_V1.to_string(),
            subject: subjects
                .into_iter()
                .enumerate()
                .map(|(i, digest)| Subject {
                    name: format!("subject-{}", i),
                    digest,
                })
                .collect(),
            predicate_type: predicate_type.to_string(),
            predicate: serde_json::Value::Null,
        }
    }

    fn foo() -> Sha256Hash {
        Sha256Hash::from_hex(FOO_SHA256).unwrap()
    }

    #[test]
    fn test_matching_subject() {
        let st = statement("p", vec![DigestSet::new().with("sha256", FOO_SHA256)]);
        assert!(check_claims(&st, &foo(), None).is_ok());
    }

    #[test]
    fn test_digest_comparison_ignores_case() {
        let upper = FOO_SHA256.to_ascii_uppercase();
        let st = statement("p", vec![DigestSet::new().with("sha256", upper)]);
        assert!(check_claims(&st, &foo(), None).is_ok());
    }

    #[test]
    fn test_any_subject_may_match() {
        let st = statement(
            "p",
            vec![
                DigestSet::new().with("sha512", "abcd"),
                DigestSet::new().with("sha256", BAR_SHA256),
                DigestSet::new().with("sha256", FOO_SHA256),
            ],
        );
        assert!(check_claims(&st, &foo(), None).is_ok());
    }

    #[test]
    fn test_no_subjects() {
        let st = statement("p", vec![]);
        assert!(matches!(
            check_claims(&st, &foo(), None),
            Err(Error::SubjectMissing(_))
        ));
    }

    #[test]
    fn test_no_sha256_anywhere() {
        let st = statement(
            "p",
            vec![DigestSet::new().with("sha512", "abcd"), DigestSet::new()],
        );
        assert!(matches!(
            check_claims(&st, &foo(), None),
            Err(Error::DigestMissing(_))
        ));
    }

    #[test]
    fn test_mismatch() {
        let st = statement("p", vec![DigestSet::new().with("sha256", BAR_SHA256)]);
        assert!(matches!(
            check_claims(&st, &foo(), None),
            Err(Error::DigestMismatch(_))
        ));
    }

    #[test]
    fn test_predicate_type_checked_before_digest() {
        let st = statement(
            "https://slsa.dev/provenance/v0.2",
            vec![DigestSet::new().with("sha256", BAR_SHA256)],
        );
        assert!(matches!(
            check_claims(&st, &foo(), Some("https://example.com/other")),
            Err(Error::PredicateTypeMismatch(_))
        ));
    }

    #[test]
    fn test_empty_predicate_type_is_unconstrained() {
        let st = statement("customFoo", vec![DigestSet::new().with("sha256", FOO_SHA256)]);
        assert!(check_claims(&st, &foo(), Some("")).is_ok());

        let st = statement("customFoo", vec![DigestSet::new().with("sha256", BAR_SHA256)]);
        assert!(matches!(
            check_claims(&st, &foo(), Some("")),
            Err(Error::DigestMismatch(_))
        ));
    }

    #[test]
    fn test_predicate_type_short_names() {
        assert!(predicate_type_matches(
            "https://slsa.dev/provenance/v0.2",
            "slsaprovenance"
        ));
        assert!(predicate_type_matches(
            "https://slsa.dev/provenance/v1",
            "slsaprovenance1"
        ));
        assert!(predicate_type_matches("https://spdx.dev/Document", "spdxjson"));
        assert!(predicate_type_matches("customFoo", "customFoo"));
        assert!(!predicate_type_matches("customFoo", "custom"));
        assert!(!predicate_type_matches(
            "https://slsa.dev/provenance/v1",
            "slsaprovenance"
        ));
        assert_eq!(predicate_type_uri("unknown"), None);
    }
}
