//! Audit log database model

use chrono::{DateTime, Utc};
use guard_core::AuditRecord;
use sqlx::FromRow;

/// Database model for the query audit table
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogModel {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    /// Already truncated by the writer
    pub query: String,
    pub success: bool,
    pub rows_returned: i64,
    pub source_ip: String,
}

impl From<AuditLogModel> for AuditRecord {
    fn from(model: AuditLogModel) -> Self {
        Self {
            timestamp: model.timestamp,
            user_id: model.user_id,
            query: model.query,
            success: model.success,
            rows_returned: model.rows_returned,
            source_ip: model.source_ip,
        }
    }
}
