//! PostgreSQL implementation of SqlExecutor
//!
//! Statements are not run directly. They are passed as a text argument to a
//! database-side function (e.g. `exec_sql(query text) RETURNS jsonb`) which
//! runs them under its own role and returns the rows as a JSON array.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use tracing::instrument;

use guard_core::{ExecResult, SqlExecutor, TableName, ValidationReason};

use crate::error::map_exec_error;

/// PostgreSQL implementation of SqlExecutor
#[derive(Clone)]
pub struct PgSqlExecutor {
    pool: PgPool,
    call_sql: String,
}

impl PgSqlExecutor {
    /// Create a new executor that calls `function` for every statement
    ///
    /// # Errors
    /// Returns `InvalidIdentifier` if the function name is not a plain identifier
    pub fn new(pool: PgPool, function: &str) -> Result<Self, ValidationReason> {
        let function = TableName::parse(function)?;
        Ok(Self {
            pool,
            call_sql: rpc_call_sql(&function),
        })
    }

    /// SQL used to invoke the RPC function
    pub fn call_sql(&self) -> &str {
        &self.call_sql
    }
}

fn rpc_call_sql(function: &TableName) -> String {
    format!("SELECT {function}($1::text) AS result")
}

#[async_trait]
impl SqlExecutor for PgSqlExecutor {
    #[instrument(skip(self, statement), fields(statement_len = statement.len()))]
    async fn execute(&self, statement: &str) -> ExecResult<JsonValue> {
        let result = sqlx::query_scalar::<_, Option<JsonValue>>(&self.call_sql)
            .bind(statement)
            .fetch_one(&self.pool)
            .await
            .map_err(map_exec_error)?;

        Ok(result.unwrap_or(JsonValue::Null))
    }

    #[instrument(skip(self))]
    async fn ping(&self) -> ExecResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(map_exec_error)?;
        Ok(())
    }
}
