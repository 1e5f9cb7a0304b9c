//! # guard-db
//!
//! Database layer implementing the `guard-core` ports with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management
//! - `PgSqlExecutor`: forwards validated statements to a database-side RPC
//!   function that runs arbitrary SQL and returns JSON
//! - `PgAuditSink`: appends audit records to an append-only table
//!
//! ## Usage
//!
//! ```rust,ignore
//! use guard_db::{create_pool, PgAuditSink, PgSqlExecutor, PoolConfig};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::from_env()).await?;
//!     let executor = PgSqlExecutor::new(pool.clone(), "exec_sql")?;
//!     let sink = PgAuditSink::new(pool, "query_audit_log")?;
//!     Ok(())
//! }
//! ```

pub mod audit;
pub mod error;
pub mod executor;
pub mod models;
pub mod pool;

// Re-export commonly used types
pub use audit::PgAuditSink;
pub use executor::PgSqlExecutor;
pub use models::AuditLogModel;
pub use pool::{create_pool, create_pool_from_env, PgPool, PoolConfig};
