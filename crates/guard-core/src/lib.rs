//! # guard-core
//!
//! Domain layer for the query guard: the immutable query policy, the lexical
//! validator, audit records, and the ports to the remote SQL RPC and the
//! audit sink. This crate has zero dependencies on infrastructure (database,
//! web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod validation;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{truncate_query, AuditRecord, QueryRequest, ANONYMOUS_USER};
pub use error::{AuditError, DomainError, ExecutionError};
pub use traits::{AuditSink, ExecResult, SqlExecutor};
pub use validation::{check_query, validate_query, ValidationReason, ValidationResult};
pub use value_objects::{is_safe_identifier, PolicyProfile, QueryPolicy, TableName};
