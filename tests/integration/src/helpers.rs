//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use guard_api::{create_app, create_app_state, serve, AppState};
use guard_common::{auth::sign, AppConfig, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use guard_core::{AuditSink, SqlExecutor};
use guard_service::ServiceContext;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    secret: Option<String>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server around the given executor and sink
    pub async fn start(
        executor: Arc<dyn SqlExecutor>,
        sink: Arc<dyn AuditSink>,
        overrides: &[(&str, &str)],
    ) -> Result<Self> {
        let config = test_config(overrides)?;
        let ctx = ServiceContext::builder()
            .executor(executor)
            .audit_sink(sink)
            .policy(config.policy.to_policy())
            .build()
            .map_err(|e| anyhow::anyhow!("Context error: {e}"))?;

        Self::start_with_state(AppState::new(ctx, config)).await
    }

    /// Start a server wired to the database named by `DATABASE_URL`
    pub async fn start_live() -> Result<Self> {
        let url = std::env::var("DATABASE_URL")?;
        let config = test_config(&[("DATABASE_URL", &url)])?;
        let state = create_app_state(config).await?;
        Self::start_with_state(state).await
    }

    /// Start a server from prepared state
    pub async fn start_with_state(state: AppState) -> Result<Self> {
        let secret = state.config().signature.secret.clone();

        // Build application
        let app = create_app(state)?;

        // Ephemeral port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        // Spawn server task
        let handle = tokio::spawn(async move {
            serve(listener, app).await.ok();
        });

        // Create HTTP client
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            secret,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request signed over its target (`path?query`)
    pub async fn get_signed(&self, path: &str) -> Result<Response> {
        let secret = self
            .secret
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Server has no signing secret"))?;
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(path, &timestamp, secret)?;
        let url = format!("{}{}", self.base_url(), path);

        Ok(self
            .client
            .get(&url)
            .header(SIGNATURE_HEADER, signature)
            .header(TIMESTAMP_HEADER, timestamp)
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request signed with the server's secret at the current time
    pub async fn post_signed<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let secret = self
            .secret
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Server has no signing secret"))?;
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.post_signed_with(path, body, secret, &timestamp).await
    }

    /// Make a POST request signed with an explicit secret and timestamp
    pub async fn post_signed_with<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        secret: &str,
        timestamp: &str,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        let payload = serde_json::to_string(body)?;
        let signature = sign(&payload, timestamp, secret)?;

        Ok(self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header(SIGNATURE_HEADER, signature)
            .header(TIMESTAMP_HEADER, timestamp)
            .body(payload)
            .send()
            .await?)
    }
}

/// Build a test configuration from defaults plus overrides
///
/// The rate limit is raised so tests never trip it.
pub fn test_config(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let mut values: Vec<(String, String)> = vec![
        ("API_PORT".to_string(), "0".to_string()),
        ("DATABASE_URL".to_string(), "postgres://localhost/unused".to_string()),
        ("RATE_LIMIT_REQUESTS_PER_SECOND".to_string(), "1000".to_string()),
        ("RATE_LIMIT_BURST".to_string(), "1000".to_string()),
    ];
    values.extend(overrides.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())));

    AppConfig::from_lookup(|key| {
        values
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Helper to check if a live database is available
pub async fn check_test_env() -> bool {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }

    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
