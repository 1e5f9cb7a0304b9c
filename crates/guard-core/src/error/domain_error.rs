//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::validation::ValidationReason;

/// Failure of the remote SQL execution call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The database rejected or failed the statement; text is kept verbatim
    #[error("{0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),
}

/// Failure to persist an audit record (never fatal to the caller)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    #[error("Audit sink write failed: {0}")]
    Storage(String),

    #[error("Audit record serialization failed: {0}")]
    Serialization(String),
}

/// Why a guarded statement produced no data
///
/// Audit failures never reach the caller and have no variant here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(#[from] ValidationReason),

    #[error("{0}")]
    Execution(#[from] ExecutionError),
}

impl DomainError {
    /// Stable code for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(reason) => reason.code(),
            Self::Execution(ExecutionError::Database(_)) => "DATABASE_ERROR",
            Self::Execution(ExecutionError::Connection(_)) => "CONNECTION_ERROR",
            Self::Execution(ExecutionError::InvalidResponse(_)) => "INVALID_RPC_RESPONSE",
        }
    }

    /// Check if the statement was stopped before reaching the executor
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
