//! # guard-common
//!
//! Shared utilities including configuration, error handling, request signing, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{SignatureVerifier, SignedEnvelope, SIGNATURE_HEADER, TIMESTAMP_HEADER};
pub use config::{
    AppConfig, AppSettings, AuditConfig, ConfigError, CorsConfig, DatabaseConfig, Environment,
    PolicyConfig, RateLimitConfig, RpcConfig, ServerConfig, SignatureConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError, AUDIT_TARGET,
};
