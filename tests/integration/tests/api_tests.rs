//! API integration tests
//!
//! These tests drive the HTTP surface end to end with in-memory collaborators.
//! `test_live_database_round_trip` additionally needs `DATABASE_URL`.

use std::sync::Arc;

use guard_core::ExecutionError;
use guard_service::testing::FailingExecutor;
use integration_tests::*;
use reqwest::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start(sample_executor(), memory_sink(), &[])
        .await
        .expect("Failed to start server");

    let response = server.get("/health").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_reports_unreachable_database() {
    let executor = Arc::new(FailingExecutor::new(ExecutionError::Connection(
        "connection refused".to_string(),
    )));
    let server = TestServer::start(executor, memory_sink(), &[])
        .await
        .expect("Failed to start server");

    let response = server.get("/health/ready").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::SERVICE_UNAVAILABLE)
        .await
        .unwrap();

    assert_eq!(body["checks"]["database"], "unhealthy");
}

// ============================================================================
// run_sql
// ============================================================================

#[tokio::test]
async fn test_run_sql_returns_rows_and_metadata() {
    let executor = sample_executor();
    let sink = memory_sink();
    let server = TestServer::start(executor.clone(), sink.clone(), &[])
        .await
        .expect("Failed to start server");

    let body = RunSqlBody::new("SELECT id, email FROM users LIMIT 3", "analyst-7");
    let response = server.post(RUN_SQL_PATH, &body).await.expect("Request failed");
    let result: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(result["data"], sample_rows());
    assert_eq!(result["metadata"]["rowCount"], 3);
    assert_eq!(result["metadata"]["userId"], "analyst-7");
    assert!(result["metadata"]["executionTimeMs"].is_u64());
    assert!(result["metadata"]["timestamp"].is_string());

    // Forwarded verbatim
    assert_eq!(
        executor.statements(),
        vec!["SELECT id, email FROM users LIMIT 3".to_string()]
    );

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].success);
    assert_eq!(records[0].rows_returned, 3);
    assert_eq!(records[0].user_id, "analyst-7");
}

#[tokio::test]
async fn test_run_sql_defaults_to_anonymous_user() {
    let sink = memory_sink();
    let server = TestServer::start(sample_executor(), sink.clone(), &[])
        .await
        .expect("Failed to start server");

    let body = RunSqlBody::anonymous("SELECT 1 LIMIT 1");
    let response = server.post(RUN_SQL_PATH, &body).await.expect("Request failed");
    let result: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(result["metadata"]["userId"], "anonymous");
    assert_eq!(sink.records()[0].user_id, "anonymous");
}

#[tokio::test]
async fn test_rejected_query_is_audited_and_never_forwarded() {
    let executor = sample_executor();
    let sink = memory_sink();
    let server = TestServer::start(executor.clone(), sink.clone(), &[])
        .await
        .expect("Failed to start server");

    for query in [
        "DELETE FROM users",
        "SELECT * FROM users",
        "SELECT * FROM users LIMIT 5000",
        "SELECT * FROM users LIMIT 5 -- trailing",
    ] {
        let response = server
            .post(RUN_SQL_PATH, &RunSqlBody::new(query, "mallory"))
            .await
            .expect("Request failed");
        let result: Value = assert_json(response, StatusCode::OK).await.unwrap();

        assert_eq!(result["error"], "Query validation failed", "query: {query}");
        assert!(result["message"].is_string());
        assert!(result["timestamp"].is_string());
        assert!(result.get("data").is_none());
    }

    assert!(executor.statements().is_empty());

    let records = sink.records();
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| !r.success && r.rows_returned == 0));
}

#[tokio::test]
async fn test_strict_profile_blocks_union() {
    let server = TestServer::start(
        sample_executor(),
        memory_sink(),
        &[("POLICY_PROFILE", "strict")],
    )
    .await
    .expect("Failed to start server");

    let body = RunSqlBody::new("SELECT a FROM t UNION SELECT b FROM u LIMIT 5", "u1");
    let response = server.post(RUN_SQL_PATH, &body).await.expect("Request failed");
    let result: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(result["error"], "Query validation failed");
}

#[tokio::test]
async fn test_execution_failure_is_reported_in_body() {
    let executor = Arc::new(FailingExecutor::new(ExecutionError::Database(
        "relation \"nope\" does not exist".to_string(),
    )));
    let sink = memory_sink();
    let server = TestServer::start(executor, sink.clone(), &[])
        .await
        .expect("Failed to start server");

    let body = RunSqlBody::new("SELECT * FROM nope LIMIT 1", "u1");
    let response = server.post(RUN_SQL_PATH, &body).await.expect("Request failed");
    let result: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(result["error"], "Query execution failed");
    assert_eq!(result["message"], "relation \"nope\" does not exist");

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert!(!records[0].success);
}

#[tokio::test]
async fn test_audit_failure_does_not_change_response() {
    let sink = failing_sink();
    let server = TestServer::start(sample_executor(), sink.clone(), &[])
        .await
        .expect("Failed to start server");

    let body = RunSqlBody::new("SELECT id FROM users LIMIT 3", "u1");
    let response = server.post(RUN_SQL_PATH, &body).await.expect("Request failed");
    let result: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(result["metadata"]["rowCount"], 3);
    assert_eq!(sink.attempts(), 1);
}

#[tokio::test]
async fn test_forwarded_for_is_recorded_as_source_ip() {
    let sink = memory_sink();
    let server = TestServer::start(sample_executor(), sink.clone(), &[])
        .await
        .expect("Failed to start server");

    let response = server
        .client
        .post(format!("{}{}", server.base_url(), RUN_SQL_PATH))
        .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
        .json(&RunSqlBody::new("SELECT 1 LIMIT 1", "u1"))
        .send()
        .await
        .expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();

    assert_eq!(sink.records()[0].source_ip, "203.0.113.9");
}

#[tokio::test]
async fn test_peer_address_is_used_without_proxy_headers() {
    let sink = memory_sink();
    let server = TestServer::start(sample_executor(), sink.clone(), &[])
        .await
        .expect("Failed to start server");

    let response = server
        .post(RUN_SQL_PATH, &RunSqlBody::new("SELECT 1 LIMIT 1", "u1"))
        .await
        .expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();

    assert_eq!(sink.records()[0].source_ip, "127.0.0.1");
}

#[tokio::test]
async fn test_malformed_body_is_a_client_error() {
    let server = TestServer::start(sample_executor(), memory_sink(), &[])
        .await
        .expect("Failed to start server");

    let response = server
        .post(RUN_SQL_PATH, &json!({"user_id": "u1"}))
        .await
        .expect("Request failed");
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(body["error"], "INVALID_REQUEST_BODY");
    assert!(body["message"].is_string());
    assert!(body["timestamp"].is_string());
}

// ============================================================================
// Signed requests
// ============================================================================

const SECRET: &str = "integration-secret";

#[tokio::test]
async fn test_signed_request_is_accepted() {
    let server = TestServer::start(
        sample_executor(),
        memory_sink(),
        &[("SIGNATURE_SECRET", SECRET)],
    )
    .await
    .expect("Failed to start server");

    let body = RunSqlBody::new("SELECT id FROM users LIMIT 3", "u1");
    let response = server
        .post_signed(RUN_SQL_PATH, &body)
        .await
        .expect("Request failed");
    let result: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(result["metadata"]["rowCount"], 3);
}

#[tokio::test]
async fn test_unsigned_request_is_rejected_when_secret_configured() {
    let executor = sample_executor();
    let server = TestServer::start(
        executor.clone(),
        memory_sink(),
        &[("SIGNATURE_SECRET", SECRET)],
    )
    .await
    .expect("Failed to start server");

    let body = RunSqlBody::new("SELECT 1 LIMIT 1", "u1");
    let response = server.post(RUN_SQL_PATH, &body).await.expect("Request failed");
    let result: Value = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();

    assert_eq!(result["error"], "MISSING_SIGNATURE");
    assert_eq!(result["message"], "Missing request signature");
    assert!(result["timestamp"].is_string());
    assert!(executor.statements().is_empty());
}

#[tokio::test]
async fn test_wrong_secret_and_stale_timestamp_are_rejected() {
    let server = TestServer::start(
        sample_executor(),
        memory_sink(),
        &[("SIGNATURE_SECRET", SECRET)],
    )
    .await
    .expect("Failed to start server");
    let body = RunSqlBody::new("SELECT 1 LIMIT 1", "u1");
    let now = chrono::Utc::now().timestamp();

    let response = server
        .post_signed_with(RUN_SQL_PATH, &body, "not-the-secret", &now.to_string())
        .await
        .expect("Request failed");
    let result: Value = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(result["error"], "INVALID_SIGNATURE");

    let stale = (now - 301).to_string();
    let response = server
        .post_signed_with(RUN_SQL_PATH, &body, SECRET, &stale)
        .await
        .expect("Request failed");
    let result: Value = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(result["error"], "INVALID_SIGNATURE");
}

// ============================================================================
// Table helpers
// ============================================================================

#[tokio::test]
async fn test_table_schema_and_stats() {
    let executor = sample_executor();
    let sink = memory_sink();
    let server = TestServer::start(executor.clone(), sink.clone(), &[])
        .await
        .expect("Failed to start server");

    let response = server
        .get("/api/v1/tools/tables/users/schema?user_id=dba")
        .await
        .expect("Request failed");
    let result: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(result["data"]["table"], "users");
    assert_eq!(result["metadata"]["userId"], "dba");

    let response = server
        .get("/api/v1/tools/tables/users/stats")
        .await
        .expect("Request failed");
    let result: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(result["data"]["table"], "users");

    let statements = executor.statements();
    assert_eq!(statements.len(), 2);
    assert!(statements[0].contains("information_schema.columns"));
    assert!(statements[1].contains("COUNT(*)"));

    let queries: Vec<String> = sink.records().into_iter().map(|r| r.query).collect();
    assert_eq!(
        queries,
        vec![
            "get_table_schema(users)".to_string(),
            "get_table_stats(users)".to_string()
        ]
    );
}

#[tokio::test]
async fn test_unsafe_table_name_is_rejected() {
    let executor = sample_executor();
    let server = TestServer::start(executor.clone(), memory_sink(), &[])
        .await
        .expect("Failed to start server");

    let response = server
        .get("/api/v1/tools/tables/users%3BDROP/stats")
        .await
        .expect("Request failed");
    let result: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(result["error"], "Invalid table name");
    assert!(executor.statements().is_empty());
}

#[tokio::test]
async fn test_table_helpers_are_signed_when_secret_configured() {
    let executor = sample_executor();
    let server = TestServer::start(
        executor.clone(),
        memory_sink(),
        &[("SIGNATURE_SECRET", SECRET)],
    )
    .await
    .expect("Failed to start server");
    let path = "/api/v1/tools/tables/users/stats?user_id=dba";

    let response = server.get(path).await.expect("Request failed");
    let result: Value = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(result["error"], "MISSING_SIGNATURE");
    assert!(result["timestamp"].is_string());
    assert!(executor.statements().is_empty());

    let response = server.get_signed(path).await.expect("Request failed");
    let result: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(result["metadata"]["userId"], "dba");
    assert_eq!(executor.statements().len(), 1);
}

// ============================================================================
// Live database
// ============================================================================

#[tokio::test]
async fn test_live_database_round_trip() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start_live()
        .await
        .expect("Failed to start server");

    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .post(RUN_SQL_PATH, &RunSqlBody::new("DROP TABLE users", "u1"))
        .await
        .expect("Request failed");
    let result: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(result["error"], "Query validation failed");
}
