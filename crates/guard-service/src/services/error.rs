//! Service layer error types
//!
//! Guard outcomes travel as `GuardResponse` values, so the only service
//! failures are wiring problems found while assembling a `ServiceContext`.

use guard_common::AppError;
use thiserror::Error;

/// Service layer error type
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A required collaborator was not supplied
    #[error("Missing dependency: {0}")]
    MissingDependency(&'static str),
}

impl ServiceError {
    /// Get the error code for logs and API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingDependency(_) => "MISSING_DEPENDENCY",
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
