//! Ports - interfaces to the two external collaborators
//!
//! The domain layer defines what it needs; the infrastructure layer provides
//! the implementation (see `guard-db`).

use async_trait::async_trait;
use serde_json::Value;

use crate::entities::AuditRecord;
use crate::error::{AuditError, ExecutionError};

/// Result type for remote execution
pub type ExecResult<T> = Result<T, ExecutionError>;

// ============================================================================
// SQL Executor
// ============================================================================

/// Remote "execute arbitrary SQL" call
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Run a statement verbatim and return its JSON result
    ///
    /// Row-returning statements yield an array of objects; anything else may
    /// be any JSON value.
    async fn execute(&self, statement: &str) -> ExecResult<Value>;

    /// Cheap reachability probe for readiness checks
    async fn ping(&self) -> ExecResult<()> {
        Ok(())
    }
}

// ============================================================================
// Audit Sink
// ============================================================================

/// Append-only destination for audit records
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one record
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditError>;
}
