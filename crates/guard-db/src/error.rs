//! Error handling utilities for the database adapters

use guard_core::{AuditError, ExecutionError};
use sqlx::Error as SqlxError;

/// Convert a SQLx error from the RPC call into an `ExecutionError`
///
/// Database-reported failures keep the server's message verbatim so callers
/// see exactly what PostgreSQL said.
pub fn map_exec_error(e: SqlxError) -> ExecutionError {
    match e {
        SqlxError::Database(db_err) => ExecutionError::Database(db_err.message().to_string()),
        SqlxError::Io(_)
        | SqlxError::Tls(_)
        | SqlxError::PoolTimedOut
        | SqlxError::PoolClosed
        | SqlxError::WorkerCrashed => ExecutionError::Connection(e.to_string()),
        SqlxError::RowNotFound
        | SqlxError::ColumnNotFound(_)
        | SqlxError::ColumnDecode { .. }
        | SqlxError::Decode(_) => ExecutionError::InvalidResponse(e.to_string()),
        other => ExecutionError::Database(other.to_string()),
    }
}

/// Convert a SQLx error from an audit insert into an `AuditError`
pub fn map_audit_error(e: SqlxError) -> AuditError {
    match e {
        err @ SqlxError::Encode(_) => AuditError::Serialization(err.to_string()),
        other => AuditError::Storage(other.to_string()),
    }
}
