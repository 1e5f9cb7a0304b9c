//! Service context - dependency container for services
//!
//! Holds the remote executor, the optional audit sink, and the immutable
//! query policy. Everything is behind `Arc`, so clones are cheap and
//! concurrent requests share nothing mutable.

use std::sync::Arc;

use guard_core::{AuditSink, QueryPolicy, SqlExecutor};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    executor: Arc<dyn SqlExecutor>,
    audit_sink: Option<Arc<dyn AuditSink>>,
    policy: Arc<QueryPolicy>,
}

impl ServiceContext {
    /// Create a new service context
    pub fn new(
        executor: Arc<dyn SqlExecutor>,
        audit_sink: Option<Arc<dyn AuditSink>>,
        policy: Arc<QueryPolicy>,
    ) -> Self {
        Self {
            executor,
            audit_sink,
            policy,
        }
    }

    /// Get a builder
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    /// Get the remote SQL executor
    pub fn executor(&self) -> &dyn SqlExecutor {
        self.executor.as_ref()
    }

    /// Get the audit sink; `None` means records only go to the local log
    pub fn audit_sink(&self) -> Option<&dyn AuditSink> {
        self.audit_sink.as_deref()
    }

    /// Get the query policy
    pub fn policy(&self) -> &QueryPolicy {
        self.policy.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("executor", &"SqlExecutor")
            .field("audit_sink", &self.audit_sink.as_ref().map(|_| "AuditSink"))
            .field("policy", &self.policy)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    executor: Option<Arc<dyn SqlExecutor>>,
    audit_sink: Option<Arc<dyn AuditSink>>,
    policy: Option<Arc<QueryPolicy>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executor(mut self, executor: Arc<dyn SqlExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit_sink = Some(sink);
        self
    }

    pub fn policy(mut self, policy: QueryPolicy) -> Self {
        self.policy = Some(Arc::new(policy));
        self
    }

    /// Build the ServiceContext
    ///
    /// The policy falls back to `QueryPolicy::default()` and the audit sink is
    /// optional.
    ///
    /// # Errors
    /// Returns `ServiceError::MissingDependency` if the executor is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.executor
                .ok_or(ServiceError::MissingDependency("executor"))?,
            self.audit_sink,
            self.policy.unwrap_or_default(),
        ))
    }
}
