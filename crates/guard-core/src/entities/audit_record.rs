//! Audit record - one entry per guard invocation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Queries longer than this are truncated before being recorded
pub const AUDIT_QUERY_MAX_CHARS: usize = 1000;

/// Appended to truncated queries
pub const TRUNCATION_MARKER: &str = "...";

/// Immutable audit entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    /// Possibly truncated query text
    pub query: String,
    pub success: bool,
    pub rows_returned: i64,
    pub source_ip: String,
}

impl AuditRecord {
    /// Create a record stamped with the current time
    pub fn new(
        query: &str,
        user_id: impl Into<String>,
        success: bool,
        rows_returned: i64,
        source_ip: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            user_id: user_id.into(),
            query: truncate_query(query),
            success,
            rows_returned,
            source_ip: source_ip.into(),
        }
    }

    /// Whether the stored query was shortened
    pub fn is_truncated(&self) -> bool {
        self.query.chars().count() > AUDIT_QUERY_MAX_CHARS
    }
}

/// Keep the first [`AUDIT_QUERY_MAX_CHARS`] characters, marking the cut
pub fn truncate_query(query: &str) -> String {
    match query.char_indices().nth(AUDIT_QUERY_MAX_CHARS) {
        Some((cut, _)) => format!("{}{}", &query[..cut], TRUNCATION_MARKER),
        None => query.to_string(),
    }
}
