//! Resolved endpoints and the service instances handed to callers

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

/// Deployment stage every resolved URL points at
pub const DEPLOYMENT_STAGE: &str = "prod";

/// A gateway route whose integration invokes the requested function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEndpoint {
    /// Identifier of the API hosting the route
    pub api_id: String,
    /// Region the API is deployed in
    pub region: String,
    /// Path segment of the matched resource
    pub path_part: String,
    /// ARN of the function the integration invokes
    pub function_arn: String,
}

impl ResolvedEndpoint {
    /// Invoke URL of the route on the fixed deployment stage
    pub fn url(&self) -> String {
        format!(
            "https://{}.execute-api.{}.amazonaws.com/{}/{}",
            self.api_id, self.region, DEPLOYMENT_STAGE, self.path_part
        )
    }
}

impl fmt::Display for ResolvedEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

/// A discovered service instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstance {
    /// Service id the instance was discovered for
    pub service_id: String,

    /// Full URI of the instance
    pub uri: String,

    /// Optional metadata (e.g., api id, region, stage)
    pub metadata: HashMap<String, String>,
}

impl ServiceInstance {
    /// Create a new instance with the given URI
    pub fn new(service_id: String, uri: String) -> Self {
        Self { service_id, uri, metadata: HashMap::new() }
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: String, value: String) -> Self {
        self.metadata.insert(key, value);
        self
    }

    /// Build an instance from a resolved endpoint, recording where it came from
    pub fn from_endpoint(service_id: String, endpoint: &ResolvedEndpoint) -> Self {
        Self::new(service_id, endpoint.url())
            .with_metadata("api_id".to_string(), endpoint.api_id.clone())
            .with_metadata("path_part".to_string(), endpoint.path_part.clone())
            .with_metadata("region".to_string(), endpoint.region.clone())
            .with_metadata("stage".to_string(), DEPLOYMENT_STAGE.to_string())
            .with_metadata("function_arn".to_string(), endpoint.function_arn.clone())
    }
}

impl fmt::Display for ServiceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.uri, self.service_id)
    }
}
