//! Query request - what a caller submits to the guard

use serde::Deserialize;

/// User id recorded when the caller does not identify itself
pub const ANONYMOUS_USER: &str = "anonymous";

/// Transient request, never persisted
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            user_id: user_id.into(),
        }
    }

    /// Request on behalf of the anonymous user
    pub fn anonymous(query: impl Into<String>) -> Self {
        Self::new(query, ANONYMOUS_USER)
    }
}

fn default_user_id() -> String {
    ANONYMOUS_USER.to_string()
}
