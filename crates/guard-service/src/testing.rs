//! In-memory implementations of the ports for tests
//!
//! Enabled for this crate's own tests and, through the `testing` feature,
//! for the integration test crate.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use guard_core::{AuditError, AuditRecord, AuditSink, ExecResult, ExecutionError, SqlExecutor};
use serde_json::Value as JsonValue;

// ============================================================================
// Executors
// ============================================================================

/// Returns the same result for every statement and remembers what it was sent
#[derive(Debug, Default)]
pub struct StaticExecutor {
    result: JsonValue,
    statements: Mutex<Vec<String>>,
}

impl StaticExecutor {
    pub fn new(result: JsonValue) -> Self {
        Self {
            result,
            statements: Mutex::new(Vec::new()),
        }
    }

    /// Executor returning an array of rows
    pub fn rows(rows: Vec<JsonValue>) -> Self {
        Self::new(JsonValue::Array(rows))
    }

    /// Statements received so far, in order
    pub fn statements(&self) -> Vec<String> {
        self.statements
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SqlExecutor for StaticExecutor {
    async fn execute(&self, statement: &str) -> ExecResult<JsonValue> {
        if let Ok(mut statements) = self.statements.lock() {
            statements.push(statement.to_string());
        }
        Ok(self.result.clone())
    }
}

/// Fails every call with the same error
#[derive(Debug)]
pub struct FailingExecutor {
    error: ExecutionError,
}

impl FailingExecutor {
    pub fn new(error: ExecutionError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl SqlExecutor for FailingExecutor {
    async fn execute(&self, _statement: &str) -> ExecResult<JsonValue> {
        Err(self.error.clone())
    }

    async fn ping(&self) -> ExecResult<()> {
        Err(self.error.clone())
    }
}

// ============================================================================
// Audit Sinks
// ============================================================================

/// Keeps appended records in memory
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records appended so far, in order
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        self.records
            .lock()
            .map_err(|e| AuditError::Storage(e.to_string()))?
            .push(record.clone());
        Ok(())
    }
}

/// Rejects every append
#[derive(Debug)]
pub struct FailingAuditSink {
    message: String,
    attempts: AtomicUsize,
}

impl FailingAuditSink {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Number of append calls seen
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuditSink for FailingAuditSink {
    async fn append(&self, _record: &AuditRecord) -> Result<(), AuditError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AuditError::Storage(self.message.clone()))
    }
}
