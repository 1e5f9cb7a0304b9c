//! Lexical query validator
//!
//! Rules run in a fixed order and the first failure wins. Every check works
//! on the uppercased query text; this is a keyword filter, not a SQL parser,
//! so obfuscated input (keywords split by comments, tokens inside string
//! literals) is outside what it can reason about.

use crate::value_objects::QueryPolicy;

use super::reason::{ValidationReason, ValidationResult};

/// Two-token DDL phrases rejected even inside an otherwise allowed statement
pub const DDL_PHRASES: &[&str] = &[
    "CREATE TABLE",
    "ALTER TABLE",
    "DROP TABLE",
    "CREATE INDEX",
    "DROP INDEX",
];

/// Validate a query against a policy
pub fn validate_query(query: &str, policy: &QueryPolicy) -> ValidationResult {
    check_query(query, policy).into()
}

/// Same rules as [`validate_query`], returning the first failure as an error
pub fn check_query(query: &str, policy: &QueryPolicy) -> Result<(), ValidationReason> {
    let length = query.chars().count();
    if length > policy.max_length() {
        return Err(ValidationReason::TooLong {
            length,
            max: policy.max_length(),
        });
    }

    let normalized = query.trim().to_uppercase();

    if !policy
        .allowed_operations()
        .iter()
        .any(|op| normalized.starts_with(op.as_str()))
    {
        return Err(ValidationReason::OperationNotAllowed {
            allowed: policy.allowed_operations().to_vec(),
        });
    }

    if let Some(keyword) = policy
        .denylist()
        .iter()
        .find(|token| normalized.contains(token.as_str()))
    {
        return Err(ValidationReason::DangerousKeyword {
            keyword: keyword.clone(),
        });
    }

    // Phrase checks tolerate arbitrary whitespace between the two tokens
    let collapsed = collapse_whitespace(&normalized);

    if let Some(phrase) = DDL_PHRASES.iter().find(|phrase| collapsed.contains(*phrase)) {
        return Err(ValidationReason::DdlBlocked {
            phrase: (*phrase).to_string(),
        });
    }

    if collapsed.contains("COPY") && collapsed.contains("FROM PROGRAM") {
        return Err(ValidationReason::CopyProgramBlocked);
    }

    if policy.require_limit() && normalized.starts_with("SELECT") && !normalized.contains("LIMIT")
    {
        return Err(ValidationReason::MissingLimit);
    }

    if let Some(digits) = first_limit_value(&normalized) {
        let exceeded = match digits.parse::<u64>() {
            Ok(limit) => limit > policy.limit_ceiling(),
            // Too large for u64, so certainly above the ceiling
            Err(_) => true,
        };
        if exceeded {
            return Err(ValidationReason::LimitExceeded {
                limit: digits.to_string(),
                ceiling: policy.limit_ceiling(),
            });
        }
    }

    Ok(())
}

/// Find the digits of the first `LIMIT <integer>` occurrence
fn first_limit_value(upper: &str) -> Option<&str> {
    upper.match_indices("LIMIT").find_map(|(idx, keyword)| {
        let rest = &upper[idx + keyword.len()..];
        let trimmed = rest.trim_start();
        if trimmed.len() == rest.len() {
            return None;
        }
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        (end > 0).then(|| &trimmed[..end])
    })
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
