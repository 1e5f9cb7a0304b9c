//! Test fixtures and data generators
//!
//! Provides reusable request bodies and in-memory collaborators.

use std::sync::Arc;

use guard_service::testing::{FailingAuditSink, InMemoryAuditSink, StaticExecutor};
use serde::Serialize;
use serde_json::{json, Value};

pub const RUN_SQL_PATH: &str = "/api/v1/tools/run_sql";

/// `run_sql` request body
#[derive(Debug, Serialize)]
pub struct RunSqlBody {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl RunSqlBody {
    pub fn new(query: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            user_id: Some(user_id.into()),
        }
    }

    pub fn anonymous(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            user_id: None,
        }
    }
}

/// Rows the fake executor returns by default
pub fn sample_rows() -> Value {
    json!([
        {"id": 1, "email": "ada@example.com"},
        {"id": 2, "email": "grace@example.com"},
        {"id": 3, "email": "linus@example.com"}
    ])
}

/// Executor returning `sample_rows()`
pub fn sample_executor() -> Arc<StaticExecutor> {
    Arc::new(StaticExecutor::new(sample_rows()))
}

/// Fresh in-memory audit sink
pub fn memory_sink() -> Arc<InMemoryAuditSink> {
    Arc::new(InMemoryAuditSink::new())
}

/// Audit sink that always fails
pub fn failing_sink() -> Arc<FailingAuditSink> {
    Arc::new(FailingAuditSink::new("audit store unavailable"))
}
