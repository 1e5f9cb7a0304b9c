//! Application state
//!
//! Holds the shared state for the Axum application including
//! the service context, configuration, and request signature verifier.

use std::sync::Arc;

use guard_common::{AppConfig, SignatureVerifier};
use guard_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// Application configuration
    config: Arc<AppConfig>,
    /// Present when a signing secret is configured
    signature_verifier: Option<Arc<SignatureVerifier>>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        let signature_verifier = config
            .signature
            .secret
            .as_deref()
            .map(|secret| Arc::new(SignatureVerifier::new(secret)));

        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            signature_verifier,
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the signature verifier, if requests must be signed
    pub fn signature_verifier(&self) -> Option<&SignatureVerifier> {
        self.signature_verifier.as_deref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .field("signed_requests", &self.signature_verifier.is_some())
            .finish()
    }
}
