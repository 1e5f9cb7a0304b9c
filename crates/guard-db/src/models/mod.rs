//! Database models - SQLx-compatible structs for PostgreSQL tables

mod audit_log;

pub use audit_log::AuditLogModel;
