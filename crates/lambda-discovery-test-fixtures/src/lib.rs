//! Test fixtures for lambda-discovery integration tests.
//!
//! Builds in-memory function registries and gateways with a small fluent
//! API, and wires them into resolvers and discovery clients while keeping
//! handles to the collaborators so tests can inspect call counts.
//!
//! # Usage
//!
//! ```rust,no_run
//! use lambda_discovery::DiscoveryClient;
//! use lambda_discovery_test_fixtures::TestTopology;
//!
//! # async fn run() {
//! let topology = TestTopology::new()
//!     .function("uppercase", "arn:fn:uppercase")
//!     .api("api1")
//!     .route("api1", "r1", "uppercase", "GET", "arn:fn:uppercase");
//!
//! let client = topology.client();
//! let instances = client.instances("uppercase").await.unwrap();
//! # }
//! ```

use std::sync::Arc;

use lambda_discovery::{
    DiscoveryConfig, EndpointResolver, GatewayApi, HttpMethod, Integration, LambdaDiscoveryClient,
    MemoryFunctionRegistry, MemoryGateway, ResourcePath,
};
use prometheus::Registry;

/// Region every fixture resolves in
pub const TEST_REGION: &str = "us-east-1";

/// Lambda-style integration URI wrapping a function ARN
pub fn lambda_integration_uri(function_arn: &str) -> String {
    format!(
        "arn:aws:apigateway:{}:lambda:path/2015-03-31/functions/{}/invocations",
        TEST_REGION, function_arn
    )
}

/// Expected invoke URL for a route in the test region
pub fn expected_url(api_id: &str, path_part: &str) -> String {
    format!("https://{}.execute-api.{}.amazonaws.com/prod/{}", api_id, TEST_REGION, path_part)
}

/// In-memory registry and gateway shared with the resolvers built from them
#[derive(Debug, Default, Clone)]
pub struct TestTopology {
    pub registry: Arc<MemoryFunctionRegistry>,
    pub gateway: Arc<MemoryGateway>,
}

impl TestTopology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function
    pub fn function(self, name: &str, arn: &str) -> Self {
        self.registry.register(name, arn);
        self
    }

    /// Add a gateway API
    pub fn api(self, api_id: &str) -> Self {
        self.gateway.add_api(GatewayApi::new(api_id));
        self
    }

    /// Add a resource without any integration
    pub fn resource(self, api_id: &str, resource_id: &str, path_part: &str) -> Self {
        self.gateway.add_resource(api_id, ResourcePath::new(resource_id, path_part));
        self
    }

    /// Add a resource and bind an integration with the given target to it
    ///
    /// # Panics
    ///
    /// Panics if `method` is not a valid HTTP method token.
    pub fn route(
        self,
        api_id: &str,
        resource_id: &str,
        path_part: &str,
        method: &str,
        target: &str,
    ) -> Self {
        let topology = self.resource(api_id, resource_id, path_part);
        topology.bind(api_id, resource_id, method, target)
    }

    /// Bind an integration to an existing resource
    ///
    /// # Panics
    ///
    /// Panics if `method` is not a valid HTTP method token.
    pub fn bind(self, api_id: &str, resource_id: &str, method: &str, target: &str) -> Self {
        let method: HttpMethod = method.parse().expect("valid HTTP method");
        self.gateway.bind(api_id, resource_id, method, Integration::new(target));
        self
    }

    /// Resolver over this topology
    pub fn resolver(&self) -> EndpointResolver {
        EndpointResolver::new(self.registry.clone(), self.gateway.clone(), TEST_REGION)
    }

    /// Discovery client over this topology, without metrics
    pub fn client(&self) -> LambdaDiscoveryClient {
        LambdaDiscoveryClient::new(self.resolver())
    }

    /// Discovery client built from configuration, registering its metrics
    /// in `metrics_registry`
    ///
    /// # Panics
    ///
    /// Panics if the metrics cannot be registered.
    pub fn configured_client(&self, metrics_registry: &Registry) -> LambdaDiscoveryClient {
        let config = DiscoveryConfig { region: TEST_REGION.to_string(), ..Default::default() };
        LambdaDiscoveryClient::from_config(
            self.registry.clone(),
            self.gateway.clone(),
            &config,
            metrics_registry,
        )
        .expect("valid test configuration")
    }
}

/// The `uppercase` function routed through a single API at `/uppercase`
pub fn uppercase_topology() -> TestTopology {
    TestTopology::new().function("uppercase", "arn:fn:uppercase").api("api1").route(
        "api1",
        "r1",
        "uppercase",
        "GET",
        &lambda_integration_uri("arn:fn:uppercase"),
    )
}
