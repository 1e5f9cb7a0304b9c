//! Health service
//!
//! Readiness is the executor's reachability.

use tracing::{instrument, warn};

use crate::dto::ReadinessResponse;

use super::context::ServiceContext;

/// Health service
pub struct HealthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> HealthService<'a> {
    /// Create a new HealthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Probe dependencies
    #[instrument(skip(self))]
    pub async fn readiness(&self) -> ReadinessResponse {
        let database_healthy = match self.ctx.executor().ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Executor ping failed");
                false
            }
        };

        ReadinessResponse::ready(database_healthy)
    }
}
