//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use guard_core::DomainError;
use serde_json::Value as JsonValue;

/// `error` text when the validator rejects a statement
pub const VALIDATION_FAILED: &str = "Query validation failed";

/// `error` text when the remote call fails
pub const EXECUTION_FAILED: &str = "Query execution failed";

/// `error` text when a table helper gets an unsafe identifier
pub const INVALID_TABLE_NAME: &str = "Invalid table name";

// ============================================================================
// Guard Responses
// ============================================================================

/// Outcome of a guard invocation
///
/// Serialized without a tag: either `{data, metadata}` or
/// `{error, message, timestamp}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GuardResponse {
    Success {
        data: JsonValue,
        metadata: QueryMetadata,
    },
    Failure {
        error: String,
        message: String,
        timestamp: DateTime<Utc>,
    },
}

/// Timing and identity attached to successful results
///
/// Serialized as `{rowCount, executionTimeMs, timestamp, userId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMetadata {
    pub row_count: usize,
    pub execution_time_ms: u64,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
}

impl GuardResponse {
    pub fn success(data: JsonValue, metadata: QueryMetadata) -> Self {
        Self::Success { data, metadata }
    }

    pub fn failure(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Failure body for a statement that was rejected or failed remotely
    pub fn from_error(err: &DomainError) -> Self {
        let error = match err {
            DomainError::Validation(_) => VALIDATION_FAILED,
            DomainError::Execution(_) => EXECUTION_FAILED,
        };
        Self::failure(error, err.to_string())
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Result payload, if successful
    pub fn data(&self) -> Option<&JsonValue> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Failure message, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message, .. } => Some(message),
        }
    }

    /// Replace the payload of a successful response
    #[must_use]
    pub fn map_data(self, f: impl FnOnce(JsonValue) -> JsonValue) -> Self {
        match self {
            Self::Success { data, metadata } => Self::Success {
                data: f(data),
                metadata,
            },
            failure => failure,
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
