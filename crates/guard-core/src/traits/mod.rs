//! Port traits implemented by the infrastructure layer

mod ports;

pub use ports::{AuditSink, ExecResult, SqlExecutor};
