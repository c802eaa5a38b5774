//! Function-to-endpoint resolution
//!
//! Resolution walks every gateway API, every resource path under it and
//! every requested method, fetching the integration bound to each pair.
//! Integrations whose target contains the function ARN are turned into
//! endpoints; the first distinct one in enumeration order wins.
//!
//! Probes are issued one at a time. The cost is one gateway call per
//! (API, path, method) combination, and nothing is cached between calls.

use std::{sync::Arc, time::Instant};

use tracing::{debug, info, warn};

use crate::{
    DiscoveryError, FunctionIdentity, FunctionRegistry, GatewayApi, GatewayInspector, Integration,
    MethodFilter, ResolvedEndpoint, ResourcePath, Result, metrics::DiscoveryMetrics,
};

/// Resolves logical function names to gateway endpoints
#[derive(Debug, Clone)]
pub struct EndpointResolver {
    registry: Arc<dyn FunctionRegistry>,
    gateway: Arc<dyn GatewayInspector>,
    region: String,
    metrics: Option<Arc<DiscoveryMetrics>>,
}

impl EndpointResolver {
    /// Create a resolver for functions and APIs in `region`
    pub fn new(
        registry: Arc<dyn FunctionRegistry>,
        gateway: Arc<dyn GatewayInspector>,
        region: impl Into<String>,
    ) -> Self {
        Self { registry, gateway, region: region.into(), metrics: None }
    }

    /// Record resolution metrics
    pub fn with_metrics(mut self, metrics: Arc<DiscoveryMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Region used when building endpoint URLs
    pub fn region(&self) -> &str {
        &self.region
    }

    /// List the logical names of all registered functions, in registry order
    pub async fn list_function_names(&self) -> Result<Vec<String>> {
        let functions = self.registry.list_functions().await?;
        debug!(count = functions.len(), "Listed registered functions");
        Ok(functions.into_iter().map(|f| f.name).collect())
    }

    /// Resolve a function endpoint probing the default method set
    pub async fn resolve(&self, function_name: &str) -> Result<ResolvedEndpoint> {
        self.resolve_endpoint(function_name, &MethodFilter::default()).await
    }

    /// Resolve the gateway endpoint whose integration invokes `function_name`
    ///
    /// # Errors
    ///
    /// - `InvalidServiceId` if the name is empty
    /// - `FunctionNotFound` if the registry has no such function; no gateway
    ///   call is made in that case
    /// - `NoEndpoint` if no integration targets the function
    /// - `Registry` / `Gateway` if a collaborator fails
    pub async fn resolve_endpoint(
        &self,
        function_name: &str,
        methods: &MethodFilter,
    ) -> Result<ResolvedEndpoint> {
        let started = Instant::now();
        let result = self.resolve_uncounted(function_name, methods).await;

        if let Some(metrics) = &self.metrics {
            let outcome = match &result {
                Ok(_) => "success",
                Err(e) => e.kind(),
            };
            metrics.record_resolution(outcome, started.elapsed().as_secs_f64());
        }

        result
    }

    async fn resolve_uncounted(
        &self,
        function_name: &str,
        methods: &MethodFilter,
    ) -> Result<ResolvedEndpoint> {
        if function_name.trim().is_empty() {
            return Err(DiscoveryError::InvalidServiceId("function name is empty".to_string()));
        }

        let function = self.registry.get_function(function_name).await?;

        debug!(
            function_name = %function.name,
            function_arn = %function.arn,
            methods = ?methods.methods(),
            "Resolving gateway endpoint"
        );

        let endpoints = self.matching_endpoints(&function, methods).await?;

        if endpoints.len() > 1 {
            warn!(
                function_name = %function.name,
                candidates = ?endpoints.iter().map(ResolvedEndpoint::url).collect::<Vec<_>>(),
                "Multiple gateway endpoints invoke function, using the first"
            );
            if let Some(metrics) = &self.metrics {
                metrics.record_ambiguous();
            }
        }

        let endpoint = endpoints
            .into_iter()
            .next()
            .ok_or_else(|| DiscoveryError::NoEndpoint(function.name.clone()))?;

        info!(
            function_name = %function.name,
            url = %endpoint,
            "Resolved gateway endpoint"
        );

        Ok(endpoint)
    }

    /// Every distinct endpoint whose integration targets the function, in
    /// enumeration order
    async fn matching_endpoints(
        &self,
        function: &FunctionIdentity,
        methods: &MethodFilter,
    ) -> Result<Vec<ResolvedEndpoint>> {
        let mut endpoints: Vec<ResolvedEndpoint> = Vec::new();

        for api in self.gateway.list_apis().await? {
            let resources = self.gateway.list_resource_paths(&api.id).await?;

            debug!(api_id = %api.id, resource_count = resources.len(), "Inspecting gateway API");

            for resource in &resources {
                let matched = self
                    .probe_resource(&api, resource, methods)
                    .await?
                    .into_iter()
                    .filter(|integration| integration.targets(&function.arn))
                    .map(|_| self.endpoint_for(&api, resource, function));

                for endpoint in matched {
                    if !endpoints.iter().any(|seen| seen.url() == endpoint.url()) {
                        endpoints.push(endpoint);
                    }
                }
            }
        }

        Ok(endpoints)
    }

    /// Integrations bound to one resource, one per method that has a binding
    async fn probe_resource(
        &self,
        api: &GatewayApi,
        resource: &ResourcePath,
        methods: &MethodFilter,
    ) -> Result<Vec<Integration>> {
        let mut integrations = Vec::new();

        for &method in methods.methods() {
            let integration = self.gateway.get_integration(&api.id, &resource.id, method).await?;

            if let Some(metrics) = &self.metrics {
                metrics.record_probe(integration.is_some());
            }

            integrations.extend(integration);
        }

        Ok(integrations)
    }

    fn endpoint_for(
        &self,
        api: &GatewayApi,
        resource: &ResourcePath,
        function: &FunctionIdentity,
    ) -> ResolvedEndpoint {
        ResolvedEndpoint {
            api_id: api.id.clone(),
            region: self.region.clone(),
            path_part: resource.path_part.clone(),
            function_arn: function.arn.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use prometheus::Registry;

    use super::*;
    use crate::{HttpMethod, MemoryFunctionRegistry, MemoryGateway};

    fn resolver(registry: MemoryFunctionRegistry, gateway: MemoryGateway) -> EndpointResolver {
        EndpointResolver::new(Arc::new(registry), Arc::new(gateway), "us-east-1")
    }

    #[tokio::test]
    async fn test_resolve_single_match() {
        let registry = MemoryFunctionRegistry::new();
        registry.register("uppercase", "arn:fn:uppercase");

        let gateway = MemoryGateway::new();
        gateway.add_api(GatewayApi::new("api1"));
        gateway.add_resource("api1", ResourcePath::new("r1", "uppercase"));
        gateway.bind("api1", "r1", HttpMethod::Get, Integration::new("arn:fn:uppercase"));

        let endpoint = resolver(registry, gateway).resolve("uppercase").await.unwrap();
        assert_eq!(endpoint.url(), "https://api1.execute-api.us-east-1.amazonaws.com/prod/uppercase");
    }

    #[tokio::test]
    async fn test_resolve_empty_name() {
        let result = resolver(MemoryFunctionRegistry::new(), MemoryGateway::new()).resolve(" ").await;
        assert!(matches!(result, Err(DiscoveryError::InvalidServiceId(_))));
    }

    #[tokio::test]
    async fn test_resolve_respects_method_filter() {
        let registry = MemoryFunctionRegistry::new();
        registry.register("uppercase", "arn:fn:uppercase");

        let gateway = MemoryGateway::new();
        gateway.add_api(GatewayApi::new("api1"));
        gateway.add_resource("api1", ResourcePath::new("r1", "uppercase"));
        gateway.bind("api1", "r1", HttpMethod::Patch, Integration::new("arn:fn:uppercase"));

        let resolver = resolver(registry, gateway);

        // PATCH is not part of the default set
        let result = resolver.resolve("uppercase").await;
        assert!(matches!(result, Err(DiscoveryError::NoEndpoint(_))));

        let endpoint = resolver
            .resolve_endpoint("uppercase", &MethodFilter::new([HttpMethod::Patch]))
            .await
            .unwrap();
        assert_eq!(endpoint.api_id, "api1");
    }

    #[tokio::test]
    async fn test_resolve_records_metrics() {
        let registry = MemoryFunctionRegistry::new();
        registry.register("uppercase", "arn:fn:uppercase");

        let gateway = MemoryGateway::new();
        gateway.add_api(GatewayApi::new("api1"));
        gateway.add_resource("api1", ResourcePath::new("r1", "uppercase"));
        gateway.bind("api1", "r1", HttpMethod::Any, Integration::new("arn:fn:uppercase"));

        let prometheus = Registry::new();
        let metrics = Arc::new(DiscoveryMetrics::new(&prometheus).unwrap());
        let resolver = resolver(registry, gateway).with_metrics(metrics.clone());

        resolver.resolve("uppercase").await.unwrap();
        let _ = resolver.resolve("missing").await;

        assert_eq!(metrics.resolutions.with_label_values(&["success"]).get(), 1);
        assert_eq!(metrics.resolutions.with_label_values(&["function_not_found"]).get(), 1);
        assert_eq!(metrics.integration_probes.with_label_values(&["bound"]).get(), 1);
        assert_eq!(metrics.integration_probes.with_label_values(&["absent"]).get(), 5);
    }

    #[tokio::test]
    async fn test_same_url_from_two_methods_is_not_ambiguous() {
        let registry = MemoryFunctionRegistry::new();
        registry.register("uppercase", "arn:fn:uppercase");

        let gateway = MemoryGateway::new();
        gateway.add_api(GatewayApi::new("api1"));
        gateway.add_resource("api1", ResourcePath::new("r1", "uppercase"));
        gateway.bind("api1", "r1", HttpMethod::Get, Integration::new("arn:fn:uppercase"));
        gateway.bind("api1", "r1", HttpMethod::Post, Integration::new("arn:fn:uppercase"));

        let prometheus = Registry::new();
        let metrics = Arc::new(DiscoveryMetrics::new(&prometheus).unwrap());
        let resolver = resolver(registry, gateway).with_metrics(metrics.clone());

        resolver.resolve("uppercase").await.unwrap();
        assert_eq!(metrics.ambiguous_resolutions.get(), 0);
    }

    #[tokio::test]
    async fn test_distinct_urls_count_as_ambiguous() {
        let registry = MemoryFunctionRegistry::new();
        registry.register("uppercase", "arn:fn:uppercase");

        let gateway = MemoryGateway::new();
        gateway.add_api(GatewayApi::new("api1"));
        gateway.add_api(GatewayApi::new("api2"));
        gateway.add_resource("api1", ResourcePath::new("r1", "uppercase"));
        gateway.add_resource("api2", ResourcePath::new("r2", "upper"));
        gateway.bind("api1", "r1", HttpMethod::Get, Integration::new("arn:fn:uppercase"));
        gateway.bind("api2", "r2", HttpMethod::Any, Integration::new("arn:fn:uppercase"));

        let prometheus = Registry::new();
        let metrics = Arc::new(DiscoveryMetrics::new(&prometheus).unwrap());
        let resolver = resolver(registry, gateway).with_metrics(metrics.clone());

        let endpoint = resolver.resolve("uppercase").await.unwrap();

        assert_eq!(endpoint.api_id, "api1");
        assert_eq!(endpoint.path_part, "uppercase");
        assert_eq!(metrics.ambiguous_resolutions.get(), 1);
        assert_eq!(metrics.resolutions.with_label_values(&["success"]).get(), 1);
    }
}
