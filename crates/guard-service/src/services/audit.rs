//! Audit logger
//!
//! Every guard invocation produces exactly one `AuditRecord`. It is always
//! written to the local log as `QUERY_LOG: <json>` and then appended to the
//! configured sink. Sink failures are logged as `AUDIT_ERROR: <json>` and
//! never reach the caller.

use guard_common::AUDIT_TARGET;
use guard_core::{AuditError, AuditRecord, AuditSink};
use serde_json::{json, Value as JsonValue};
use tracing::{info, warn};

use super::context::ServiceContext;

/// Best-effort audit writer
pub struct AuditLogger<'a> {
    sink: Option<&'a dyn AuditSink>,
}

impl<'a> AuditLogger<'a> {
    /// Create a logger writing to the context's sink
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            sink: ctx.audit_sink(),
        }
    }

    /// Create a logger for an explicit sink
    pub fn with_sink(sink: Option<&'a dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Record one invocation
    ///
    /// Returns normally whatever happens to the sink.
    pub async fn record(&self, record: &AuditRecord) {
        match serde_json::to_string(record) {
            Ok(line) => info!(target: AUDIT_TARGET, "QUERY_LOG: {line}"),
            Err(e) => {
                let err = AuditError::Serialization(e.to_string());
                warn!(target: AUDIT_TARGET, "AUDIT_ERROR: {}", audit_error_line(&err, record));
            }
        }

        let Some(sink) = self.sink else {
            return;
        };

        if let Err(err) = sink.append(record).await {
            warn!(target: AUDIT_TARGET, "AUDIT_ERROR: {}", audit_error_line(&err, record));
        }
    }
}

fn audit_error_line(err: &AuditError, record: &AuditRecord) -> JsonValue {
    let kind = match err {
        AuditError::Storage(_) => "storage",
        AuditError::Serialization(_) => "serialization",
    };

    json!({
        "kind": kind,
        "error": err.to_string(),
        "record": serde_json::to_value(record).unwrap_or(JsonValue::Null),
    })
}
