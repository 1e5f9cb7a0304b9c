//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs

pub mod requests;
pub mod responses;

pub use requests::{RunSqlRequest, TableRequestParams};
pub use responses::{
    GuardResponse, HealthChecks, HealthResponse, QueryMetadata, ReadinessResponse,
    EXECUTION_FAILED, INVALID_TABLE_NAME, VALIDATION_FAILED,
};
