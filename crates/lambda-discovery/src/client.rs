//! Discovery client for Lambda functions behind API Gateway
//!
//! Each function has at most one externally reachable address (its gateway
//! route), so `instances` returns a single instance or an error, never a
//! list to balance over.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use tracing::debug;

use crate::{
    DiscoveryConfig, DiscoveryError, EndpointResolver, FunctionRegistry, GatewayInspector, Result,
    ServiceId, ServiceInstance, metrics::DiscoveryMetrics,
};

/// Fixed description reported by [`LambdaDiscoveryClient`]
pub const DESCRIPTION: &str =
    "A discovery client that returns URIs for AWS Lambda functions mapped to API Gateway endpoints";

/// Trait for discovery clients
#[async_trait]
pub trait DiscoveryClient: Send + Sync + fmt::Debug {
    /// Human-readable description of the client
    fn description(&self) -> &str;

    /// Logical names of all known services
    async fn services(&self) -> Result<Vec<String>>;

    /// Instances of a service
    ///
    /// # Arguments
    ///
    /// * `service_id` - The service to look up (e.g., "uppercase" or
    ///   "uppercase:v1:GET,POST")
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError` if the service cannot be resolved
    async fn instances(&self, service_id: &str) -> Result<Vec<ServiceInstance>>;
}

/// Discovery client resolving function names to API Gateway URLs
#[derive(Debug, Clone)]
pub struct LambdaDiscoveryClient {
    resolver: EndpointResolver,
}

impl LambdaDiscoveryClient {
    /// Create a client around an existing resolver
    pub fn new(resolver: EndpointResolver) -> Self {
        Self { resolver }
    }

    /// Create a client for the configured region
    ///
    /// When `observability.metrics_enabled` is set, discovery metrics are
    /// registered in `metrics_registry` and recorded on every resolution.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::Config` if the configuration is invalid or
    /// the metrics cannot be registered
    pub fn from_config(
        registry: Arc<dyn FunctionRegistry>,
        gateway: Arc<dyn GatewayInspector>,
        config: &DiscoveryConfig,
        metrics_registry: &prometheus::Registry,
    ) -> Result<Self> {
        config.validate()?;

        let client = Self::new(EndpointResolver::new(registry, gateway, config.region.clone()));
        if !config.observability.metrics_enabled {
            return Ok(client);
        }

        let metrics = DiscoveryMetrics::new(metrics_registry).map_err(|e| {
            DiscoveryError::Config(format!("Failed to register discovery metrics: {}", e))
        })?;
        Ok(client.with_metrics(Arc::new(metrics)))
    }

    /// Record resolution metrics
    pub fn with_metrics(self, metrics: Arc<DiscoveryMetrics>) -> Self {
        Self { resolver: self.resolver.with_metrics(metrics) }
    }

    /// The underlying resolver
    pub fn resolver(&self) -> &EndpointResolver {
        &self.resolver
    }
}

#[async_trait]
impl DiscoveryClient for LambdaDiscoveryClient {
    fn description(&self) -> &str {
        DESCRIPTION
    }

    async fn services(&self) -> Result<Vec<String>> {
        self.resolver.list_function_names().await
    }

    async fn instances(&self, service_id: &str) -> Result<Vec<ServiceInstance>> {
        let parsed = ServiceId::parse(service_id)?;

        debug!(
            service_id = %service_id,
            function_name = %parsed.function_name,
            "Looking up service instances"
        );

        let endpoint = self.resolver.resolve_endpoint(&parsed.function_name, &parsed.methods).await?;

        Ok(vec![ServiceInstance::from_endpoint(service_id.to_string(), &endpoint)])
    }
}
