//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, AuditConfig, ConfigError, CorsConfig, DatabaseConfig, Environment,
    PolicyConfig, RateLimitConfig, RpcConfig, ServerConfig, SignatureConfig,
};
