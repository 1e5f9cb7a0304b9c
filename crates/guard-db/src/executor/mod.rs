//! Remote SQL execution

mod pg_executor;

pub use pg_executor::PgSqlExecutor;
