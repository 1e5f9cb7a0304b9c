//! Persistent audit storage

mod pg_sink;

pub use pg_sink::PgAuditSink;
