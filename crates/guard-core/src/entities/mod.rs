//! Domain entities - the records that flow through the guard

mod audit_record;
mod query_request;

pub use audit_record::{truncate_query, AuditRecord, AUDIT_QUERY_MAX_CHARS, TRUNCATION_MARKER};
pub use query_request::{QueryRequest, ANONYMOUS_USER};
