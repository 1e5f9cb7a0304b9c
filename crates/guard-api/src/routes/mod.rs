//! Route definitions
//!
//! API routes are mounted under /api/v1; health routes live at the root.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, tools};
use crate::state::AppState;

/// Create the main API router (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new().merge(tool_routes())
}

/// Guarded SQL tools
fn tool_routes() -> Router<AppState> {
    Router::new()
        .route("/tools/run_sql", post(tools::run_sql))
        .route("/tools/tables/:table_name/schema", get(tools::get_table_schema))
        .route("/tools/tables/:table_name/stats", get(tools::get_table_stats))
}
