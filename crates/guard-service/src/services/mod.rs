//! Business logic services
//!
//! Each service borrows the shared `ServiceContext` for the duration of a
//! call and holds no state of its own.

pub mod audit;
pub mod context;
pub mod error;
pub mod guard;
pub mod health;
pub mod table;

// Re-export all services for convenience
pub use audit::AuditLogger;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use guard::QueryGuard;
pub use health::HealthService;
pub use table::TableService;
