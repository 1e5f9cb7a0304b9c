//! Query policy - the immutable rule set the validator enforces
//!
//! A policy is built once (usually from configuration) and shared by reference.
//! Two denylist profiles exist because deployments disagree on whether
//! data-modifying keywords should be rejected lexically or left to the
//! operation allowlist.

use serde::Deserialize;

/// Default maximum query length in characters
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 1000;

/// Hard ceiling for `LIMIT <n>` values
pub const LIMIT_CEILING: u64 = 500;

/// Operations allowed when nothing else is configured
pub const DEFAULT_ALLOWED_OPERATIONS: &[&str] = &["SELECT"];

/// Structural DDL/DCL keywords, procedure execution tokens, and comment markers
pub const BASE_DENYLIST: &[&str] = &[
    "DROP", "ALTER", "CREATE", "TRUNCATE", "GRANT", "REVOKE", "EXEC", "EXECUTE", "XP_", "SP_",
    "--", "/*", "*/",
];

/// Extra tokens denied by the strict profile
pub const STRICT_EXTRA_DENYLIST: &[&str] = &["UNION", "DELETE", "UPDATE", "INSERT", ";"];

/// Denylist profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PolicyProfile {
    #[default]
    Default,
    Strict,
}

impl PolicyProfile {
    /// Parse a profile name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }

    /// Denylist tokens for this profile
    pub fn denylist(self) -> Vec<String> {
        let mut tokens: Vec<String> = BASE_DENYLIST.iter().map(|t| (*t).to_string()).collect();
        if self == Self::Strict {
            tokens.extend(STRICT_EXTRA_DENYLIST.iter().map(|t| (*t).to_string()));
        }
        tokens
    }
}

/// Immutable validation policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPolicy {
    max_length: usize,
    allowed_operations: Vec<String>,
    denylist: Vec<String>,
    require_limit: bool,
    limit_ceiling: u64,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self::from_profile(PolicyProfile::Default)
    }
}

impl QueryPolicy {
    /// Build a policy with defaults and the denylist of the given profile
    pub fn from_profile(profile: PolicyProfile) -> Self {
        Self {
            max_length: DEFAULT_MAX_QUERY_LENGTH,
            allowed_operations: DEFAULT_ALLOWED_OPERATIONS
                .iter()
                .map(|op| (*op).to_string())
                .collect(),
            denylist: profile.denylist(),
            require_limit: true,
            limit_ceiling: LIMIT_CEILING,
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Replace the operation allowlist. Entries are trimmed and uppercased;
    /// blank entries are dropped.
    pub fn with_allowed_operations<I, S>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_operations = normalize_tokens(operations);
        self
    }

    /// Replace the denylist. Entries are trimmed and uppercased; blank
    /// entries are dropped.
    pub fn with_denylist<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.denylist = normalize_tokens(tokens);
        self
    }

    pub fn with_require_limit(mut self, require_limit: bool) -> Self {
        self.require_limit = require_limit;
        self
    }

    pub fn with_limit_ceiling(mut self, limit_ceiling: u64) -> Self {
        self.limit_ceiling = limit_ceiling;
        self
    }

    #[inline]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    #[inline]
    pub fn allowed_operations(&self) -> &[String] {
        &self.allowed_operations
    }

    #[inline]
    pub fn denylist(&self) -> &[String] {
        &self.denylist
    }

    #[inline]
    pub fn require_limit(&self) -> bool {
        self.require_limit
    }

    #[inline]
    pub fn limit_ceiling(&self) -> u64 {
        self.limit_ceiling
    }
}

fn normalize_tokens<I, S>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|t| t.as_ref().trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}
