//! # guard-service
//!
//! Application layer: the query guard orchestration, audit logging, table
//! introspection helpers, and the DTOs exchanged with the API layer.

pub mod dto;
pub mod services;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use dto::{
    GuardResponse, HealthChecks, HealthResponse, QueryMetadata, ReadinessResponse, RunSqlRequest,
    TableRequestParams,
};
pub use services::{
    AuditLogger, HealthService, QueryGuard, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, TableService,
};
