//! PostgreSQL implementation of AuditSink
//!
//! Expected table shape (name configurable, default `query_audit_log`):
//!
//! ```sql
//! CREATE TABLE query_audit_log (
//!     id            BIGSERIAL PRIMARY KEY,
//!     "timestamp"   TIMESTAMPTZ NOT NULL,
//!     user_id       TEXT        NOT NULL,
//!     query         TEXT        NOT NULL,
//!     success       BOOLEAN     NOT NULL,
//!     rows_returned BIGINT      NOT NULL,
//!     source_ip     TEXT        NOT NULL
//! );
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use guard_core::{AuditError, AuditRecord, AuditSink, TableName, ValidationReason};

use crate::error::map_audit_error;
use crate::models::AuditLogModel;

/// PostgreSQL implementation of AuditSink
#[derive(Clone)]
pub struct PgAuditSink {
    pool: PgPool,
    table: TableName,
}

impl PgAuditSink {
    /// Create a new sink writing to `table`
    ///
    /// # Errors
    /// Returns `InvalidIdentifier` if the table name is not a plain identifier
    pub fn new(pool: PgPool, table: &str) -> Result<Self, ValidationReason> {
        Ok(Self {
            pool,
            table: TableName::parse(table)?,
        })
    }

    /// Table the sink appends to
    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// Most recent records, newest first
    #[instrument(skip(self))]
    pub async fn recent(&self, limit: i64) -> Result<Vec<AuditRecord>, AuditError> {
        let sql = format!(
            r#"
            SELECT id, "timestamp", user_id, query, success, rows_returned, source_ip
            FROM {}
            ORDER BY "timestamp" DESC, id DESC
            LIMIT $1
            "#,
            self.table
        );

        let rows = sqlx::query_as::<_, AuditLogModel>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_audit_error)?;

        Ok(rows.into_iter().map(AuditRecord::from).collect())
    }
}

fn insert_sql(table: &TableName) -> String {
    format!(
        r#"INSERT INTO {table} ("timestamp", user_id, query, success, rows_returned, source_ip) VALUES ($1, $2, $3, $4, $5, $6)"#
    )
}

#[async_trait]
impl AuditSink for PgAuditSink {
    #[instrument(skip(self, record), fields(user_id = %record.user_id, success = record.success))]
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        sqlx::query(&insert_sql(&self.table))
            .bind(record.timestamp)
            .bind(&record.user_id)
            .bind(&record.query)
            .bind(record.success)
            .bind(record.rows_returned)
            .bind(&record.source_ip)
            .execute(&self.pool)
            .await
            .map_err(map_audit_error)?;

        Ok(())
    }
}
