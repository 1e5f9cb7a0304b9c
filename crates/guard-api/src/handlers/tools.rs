//! Tool handlers
//!
//! The three operations an orchestrating agent may call. Guard outcomes are
//! always returned as JSON with status 200; only malformed or unsigned
//! requests produce error statuses. With a signing secret configured,
//! `run_sql` signs its body and the table helpers sign their request target.

use axum::{
    extract::{Query, State},
    Json,
};
use guard_service::{GuardResponse, QueryGuard, RunSqlRequest, TableRequestParams, TableService};

use crate::extractors::{ApiPath, ClientIp, SignedJson, SignedTarget, TablePath};
use crate::response::ApiResult;
use crate::state::AppState;

/// Validate and run a SQL statement
///
/// POST /tools/run_sql
pub async fn run_sql(
    State(state): State<AppState>,
    client_ip: ClientIp,
    SignedJson(request): SignedJson<RunSqlRequest>,
) -> ApiResult<Json<GuardResponse>> {
    let guard = QueryGuard::new(state.service_context());
    let response = guard
        .execute(&request.query, &request.user_id, client_ip.as_str())
        .await;
    Ok(Json(response))
}

/// Column metadata for a table
///
/// GET /tools/tables/{table_name}/schema
pub async fn get_table_schema(
    State(state): State<AppState>,
    client_ip: ClientIp,
    _signed: SignedTarget,
    ApiPath(path): ApiPath<TablePath>,
    Query(params): Query<TableRequestParams>,
) -> ApiResult<Json<GuardResponse>> {
    let service = TableService::new(state.service_context());
    let response = service
        .get_table_schema(&path.table_name, params.user_id(), client_ip.as_str())
        .await;
    Ok(Json(response))
}

/// Row count for a table
///
/// GET /tools/tables/{table_name}/stats
pub async fn get_table_stats(
    State(state): State<AppState>,
    client_ip: ClientIp,
    _signed: SignedTarget,
    ApiPath(path): ApiPath<TablePath>,
    Query(params): Query<TableRequestParams>,
) -> ApiResult<Json<GuardResponse>> {
    let service = TableService::new(state.service_context());
    let response = service
        .get_table_stats(&path.table_name, params.user_id(), client_ip.as_str())
        .await;
    Ok(Json(response))
}
