//! Query validation

mod query_validator;
mod reason;

pub use query_validator::{check_query, validate_query, DDL_PHRASES};
pub use reason::{ValidationReason, ValidationResult};
