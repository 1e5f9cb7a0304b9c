//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use guard_common::{AppConfig, AppError};
use guard_db::{create_pool, PgAuditSink, PgSqlExecutor, PoolConfig};
use guard_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// # Errors
/// Returns `AppError::Config` if the middleware settings are invalid
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;
    let health = apply_middleware(health_routes());

    Ok(api.merge(health).with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    // Remote SQL executor
    let executor = PgSqlExecutor::new(pool.clone(), &config.rpc.function)
        .map_err(|e| AppError::Config(e.to_string()))?;
    info!(function = %config.rpc.function, "SQL executor ready");

    let mut builder = ServiceContextBuilder::new()
        .executor(Arc::new(executor))
        .policy(config.policy.to_policy());

    // Audit sink
    if config.audit.enabled {
        let sink = PgAuditSink::new(pool, &config.audit.table)
            .map_err(|e| AppError::Config(e.to_string()))?;
        builder = builder.audit_sink(Arc::new(sink));
        info!(table = %config.audit.table, "Audit sink ready");
    } else {
        warn!("Audit sink disabled; records go to the local log only");
    }

    if !config.signature.is_enabled() {
        warn!("SIGNATURE_SECRET not set; run_sql accepts unsigned requests");
    }

    let service_context = builder.build()?;

    Ok(AppState::new(service_context, config))
}

/// Serve an application on an already-bound listener
///
/// The socket peer address is made available to handlers through `ConnectInfo`.
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    serve(listener, app).await
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    // Create app state
    let state = create_app_state(config).await?;

    // Build application
    let app = create_app(state)?;

    // Run server
    run_server(app, addr).await
}
