//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize`; bodies also implement `Validate`.

use guard_core::ANONYMOUS_USER;
use serde::Deserialize;
use validator::Validate;

fn default_user_id() -> String {
    ANONYMOUS_USER.to_string()
}

/// Body of `run_sql`
///
/// Only shape is checked here. The statement itself is judged by the query
/// validator so that rejections are audited.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RunSqlRequest {
    #[validate(length(min = 1, message = "Query must not be empty"))]
    pub query: String,

    #[serde(default = "default_user_id")]
    #[validate(length(min = 1, max = 128, message = "User id must be 1-128 characters"))]
    pub user_id: String,
}

/// Optional query-string parameters for the table helpers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableRequestParams {
    pub user_id: Option<String>,
}

impl TableRequestParams {
    /// Caller identity, `anonymous` when absent
    pub fn user_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or(ANONYMOUS_USER)
    }
}
