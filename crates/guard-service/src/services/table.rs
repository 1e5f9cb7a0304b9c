//! Table introspection helpers
//!
//! The table name is checked against `^[A-Za-z0-9_]+$` before any SQL is
//! built. Accepted names are interpolated into fixed statements which go
//! straight to the executor; the statement validator is not applied since
//! it would reject their shape.

use guard_core::{AuditRecord, TableName};
use serde_json::{json, Value as JsonValue};
use tracing::{instrument, warn};

use crate::dto::{GuardResponse, INVALID_TABLE_NAME};

use super::audit::AuditLogger;
use super::context::ServiceContext;
use super::guard::QueryGuard;

/// Table helper service
pub struct TableService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TableService<'a> {
    /// Create a new TableService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Column metadata for a table, in ordinal order
    #[instrument(skip(self))]
    pub async fn get_table_schema(
        &self,
        table_name: &str,
        user_id: &str,
        source_ip: &str,
    ) -> GuardResponse {
        let operation = format!("get_table_schema({table_name})");
        let table = match self.parse_table(table_name, &operation, user_id, source_ip).await {
            Ok(table) => table,
            Err(response) => return response,
        };

        QueryGuard::new(self.ctx)
            .forward(&schema_sql(&table), &operation, user_id, source_ip)
            .await
            .map_data(|columns| json!({ "table": table, "columns": columns }))
    }

    /// Row count for a table
    #[instrument(skip(self))]
    pub async fn get_table_stats(
        &self,
        table_name: &str,
        user_id: &str,
        source_ip: &str,
    ) -> GuardResponse {
        let operation = format!("get_table_stats({table_name})");
        let table = match self.parse_table(table_name, &operation, user_id, source_ip).await {
            Ok(table) => table,
            Err(response) => return response,
        };

        QueryGuard::new(self.ctx)
            .forward(&stats_sql(&table), &operation, user_id, source_ip)
            .await
            .map_data(|rows| json!({ "table": table, "row_count": first_row_count(&rows) }))
    }

    /// Check the identifier, auditing and rejecting unsafe names
    async fn parse_table(
        &self,
        table_name: &str,
        operation: &str,
        user_id: &str,
        source_ip: &str,
    ) -> Result<TableName, GuardResponse> {
        match TableName::parse(table_name) {
            Ok(table) => Ok(table),
            Err(reason) => {
                warn!(code = reason.code(), user_id, "Table name rejected");
                AuditLogger::new(self.ctx)
                    .record(&AuditRecord::new(operation, user_id, false, 0, source_ip))
                    .await;
                Err(GuardResponse::failure(INVALID_TABLE_NAME, reason.to_string()))
            }
        }
    }
}

fn schema_sql(table: &TableName) -> String {
    format!(
        "SELECT column_name, data_type, is_nullable, column_default \
         FROM information_schema.columns \
         WHERE table_name = '{table}' \
         ORDER BY ordinal_position"
    )
}

fn stats_sql(table: &TableName) -> String {
    format!("SELECT COUNT(*) AS row_count FROM {table}")
}

/// `row_count` of the first row, or null if the result has another shape
fn first_row_count(rows: &JsonValue) -> JsonValue {
    rows.get(0)
        .and_then(|row| row.get("row_count"))
        .cloned()
        .unwrap_or(JsonValue::Null)
}
