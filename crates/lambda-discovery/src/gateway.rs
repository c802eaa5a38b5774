//! Gateway inspection capability
//!
//! Read-only view over the API gateway: the APIs it hosts, the resource
//! paths under each API, and the backend integration bound to a
//! (resource, method) pair.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{HttpMethod, Result};

/// An API hosted by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayApi {
    /// Unique API identifier (the first label of the invoke host name)
    pub id: String,
    /// Human-readable API name, if the gateway reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl GatewayApi {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A resource path under one API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePath {
    /// Identifier used to query integrations
    pub id: String,
    /// Last path segment; empty for the API root
    #[serde(default)]
    pub path_part: String,
}

impl ResourcePath {
    pub fn new(id: impl Into<String>, path_part: impl Into<String>) -> Self {
        Self { id: id.into(), path_part: path_part.into() }
    }
}

/// Backend target bound to a (resource, method) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    /// Opaque target descriptor; for function invocations it embeds the
    /// function ARN
    pub target: String,
}

impl Integration {
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into() }
    }

    /// Whether this integration invokes the function with the given ARN.
    ///
    /// Plain substring containment: the target must contain the ARN.
    pub fn targets(&self, function_arn: &str) -> bool {
        !function_arn.is_empty() && self.target.contains(function_arn)
    }
}

/// Read access to the API gateway configuration
#[async_trait]
pub trait GatewayInspector: Send + Sync + fmt::Debug {
    /// List every API, following all pages
    async fn list_apis(&self) -> Result<Vec<GatewayApi>>;

    /// List every resource path of an API, following all pages
    async fn list_resource_paths(&self, api_id: &str) -> Result<Vec<ResourcePath>>;

    /// Fetch the integration bound to a resource and method
    ///
    /// Returns `Ok(None)` when nothing is bound to the pair. That outcome is
    /// expected during discovery and is not an error.
    async fn get_integration(
        &self,
        api_id: &str,
        resource_id: &str,
        method: HttpMethod,
    ) -> Result<Option<Integration>>;
}
