//! Caller-supplied verification options

use serde::{Deserialize, Serialize};

/// How to match a certificate field against an expectation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentityMatcher {
    /// The field must equal this value
    Exact(String),
    /// The field must match this regular expression (unanchored)
    Regex(String),
}

impl IdentityMatcher {
    /// Check whether a value satisfies this matcher
    ///
    /// Fails only when a regex pattern does not compile.
    pub fn matches(&self, value: &str) -> Result<bool, regex::Error> {
        match self {
            IdentityMatcher::Exact(expected) => Ok(expected == value),
            IdentityMatcher::Regex(pattern) => Ok(regex::Regex::new(pattern)?.is_match(value)),
        }
    }
}

impl std::fmt::Display for IdentityMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityMatcher::Exact(value) => write!(f, "{:?}", value),
            IdentityMatcher::Regex(pattern) => write!(f, "/{}/", pattern),
        }
    }
}

/// Which certificate of a supplied chain acts as the trust anchor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChainRootPolicy {
    /// The last certificate in the chain is the anchor, self-signed or not
    #[default]
    LastEntry,
    /// The last certificate must also be self-signed
    RequireSelfSigned,
}

/// Options for verifying an attestation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerificationOptions {
    /// Bind the statement to the blob and check the predicate type
    pub check_claims: bool,
    /// Expected predicate type, as a URI or a well-known short name
    pub predicate_type: Option<String>,
    /// Skip the transparency log inclusion check
    pub ignore_tlog: bool,
    /// Skip the signed certificate timestamp check
    pub ignore_sct: bool,
    /// Constraint on the signer identity in the leaf certificate
    pub identity: Option<IdentityMatcher>,
    /// Constraint on the OIDC issuer in the leaf certificate
    pub issuer: Option<IdentityMatcher>,
    /// Which chain entry is trusted as the root
    pub root_policy: ChainRootPolicy,
    /// Time (Unix seconds) at which certificates must be valid; now if unset
    pub validation_time: Option<i64>,
}

impl Default for VerificationOptions {
    fn default() -> Self {
        Self {
            check_claims: true,
            predicate_type: None,
            ignore_tlog: false,
            ignore_sct: false,
            identity: None,
            issuer: None,
            root_policy: ChainRootPolicy::LastEntry,
            validation_time: None,
        }
    }
}

impl VerificationOptions {
    /// Skip transparency log verification
    pub fn skip_tlog(mut self) -> Self {
        self.ignore_tlog = true;
        self
    }

    /// Skip signed certificate timestamp verification
    pub fn skip_sct(mut self) -> Self {
        self.ignore_sct = true;
        self
    }

    /// Skip the claim check; the blob is never read
    pub fn skip_claims(mut self) -> Self {
        self.check_claims = false;
        self
    }

    /// Require a specific predicate type
    pub fn require_predicate_type(mut self, predicate_type: impl Into<String>) -> Self {
        self.predicate_type = Some(predicate_type.into());
        self
    }

    /// Require a specific identity
    pub fn require_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(IdentityMatcher::Exact(identity.into()));
        self
    }

    /// Require an identity matching a regular expression
    pub fn require_identity_regex(mut self, pattern: impl Into<String>) -> Self {
        self.identity = Some(IdentityMatcher::Regex(pattern.into()));
        self
    }

    /// Require a specific issuer
    pub fn require_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(IdentityMatcher::Exact(issuer.into()));
        self
    }

    /// Require an issuer matching a regular expression
    pub fn require_issuer_regex(mut self, pattern: impl Into<String>) -> Self {
        self.issuer = Some(IdentityMatcher::Regex(pattern.into()));
        self
    }

    /// Set the chain root policy
    pub fn with_root_policy(mut self, policy: ChainRootPolicy) -> Self {
        self.root_policy = policy;
        self
    }

    /// Validate certificates at a fixed time (Unix seconds)
    pub fn at_time(mut self, unix_seconds: i64) -> Self {
        self.validation_time = Some(unix_seconds);
        self
    }

    /// The time certificates are validated at
    pub(crate) fn effective_validation_time(&self) -> i64 {
        self.validation_time
            .unwrap_or_else(|| chrono::Utc::now().timestamp())
    }
}
