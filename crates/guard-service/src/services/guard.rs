//! Query guard
//!
//! Validate, forward, audit. The executor is only reached by statements the
//! validator accepted, and every call ends in exactly one audit record and a
//! `GuardResponse`. No retries.

use std::time::Instant;

use chrono::Utc;
use guard_core::{check_query, AuditRecord, DomainError};
use serde_json::Value as JsonValue;
use tracing::{debug, instrument, warn};

use crate::dto::{GuardResponse, QueryMetadata};

use super::audit::AuditLogger;
use super::context::ServiceContext;

/// Query guard service
pub struct QueryGuard<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> QueryGuard<'a> {
    /// Create a new QueryGuard
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Validate and run a caller-supplied statement
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn execute(&self, query: &str, user_id: &str, source_ip: &str) -> GuardResponse {
        if let Err(reason) = check_query(query, self.ctx.policy()) {
            let err = DomainError::from(reason);
            warn!(code = err.code(), user_id, "Query rejected by validator");
            AuditLogger::new(self.ctx)
                .record(&AuditRecord::new(query, user_id, false, 0, source_ip))
                .await;
            return GuardResponse::from_error(&err);
        }

        self.forward(query, query, user_id, source_ip).await
    }

    /// Send an already-vetted statement to the executor and audit the outcome
    ///
    /// `audited_as` is the text written to the audit record.
    pub(crate) async fn forward(
        &self,
        statement: &str,
        audited_as: &str,
        user_id: &str,
        source_ip: &str,
    ) -> GuardResponse {
        let audit = AuditLogger::new(self.ctx);
        let started = Instant::now();
        let result = self.ctx.executor().execute(statement).await;
        let execution_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(data) => {
                let row_count = row_count(&data);
                debug!(row_count, execution_time_ms, "Query executed");
                audit
                    .record(&AuditRecord::new(
                        audited_as,
                        user_id,
                        true,
                        i64::try_from(row_count).unwrap_or(i64::MAX),
                        source_ip,
                    ))
                    .await;

                GuardResponse::success(
                    data,
                    QueryMetadata {
                        row_count,
                        execution_time_ms,
                        timestamp: Utc::now(),
                        user_id: user_id.to_string(),
                    },
                )
            }
            Err(e) => {
                let err = DomainError::from(e);
                warn!(code = err.code(), error = %err, execution_time_ms, "Query execution failed");
                audit
                    .record(&AuditRecord::new(audited_as, user_id, false, 0, source_ip))
                    .await;
                GuardResponse::from_error(&err)
            }
        }
    }
}

/// Rows in an executor result: array length, otherwise zero
fn row_count(data: &JsonValue) -> usize {
    data.as_array().map_or(0, Vec::len)
}
