//! In-memory collaborators
//!
//! Static function registry and gateway used when the topology is known
//! up front, and as test doubles. Both record how many calls they served.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::{
    DiscoveryError, FunctionIdentity, FunctionRegistry, FunctionSummary, GatewayApi,
    GatewayInspector, HttpMethod, Integration, ResourcePath, Result,
};

/// Function registry backed by a vector, preserving registration order
#[derive(Debug, Default)]
pub struct MemoryFunctionRegistry {
    functions: RwLock<Vec<FunctionSummary>>,
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryFunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function, replacing any earlier one with the same name
    pub fn register(&self, name: impl Into<String>, arn: impl Into<String>) {
        let summary = FunctionSummary { name: name.into(), arn: arn.into() };
        let mut functions = self.functions.write();

        match functions.iter_mut().find(|f| f.name == summary.name) {
            Some(existing) => *existing = summary,
            None => functions.push(summary),
        }
    }

    /// Remove a function; returns whether it was registered
    pub fn deregister(&self, name: &str) -> bool {
        let mut functions = self.functions.write();
        let before = functions.len();
        functions.retain(|f| f.name != name);
        functions.len() != before
    }

    /// Make every subsequent call fail with a registry error
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of calls served so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin_call(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DiscoveryError::Registry("registry unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl FunctionRegistry for MemoryFunctionRegistry {
    async fn list_functions(&self) -> Result<Vec<FunctionSummary>> {
        self.begin_call()?;
        Ok(self.functions.read().clone())
    }

    async fn get_function(&self, name: &str) -> Result<FunctionIdentity> {
        self.begin_call()?;
        self.functions
            .read()
            .iter()
            .find(|f| f.name == name)
            .cloned()
            .map(FunctionIdentity::from)
            .ok_or_else(|| DiscoveryError::FunctionNotFound(name.to_string()))
    }
}

#[derive(Debug, Default)]
struct GatewayState {
    apis: Vec<GatewayApi>,
    resources: HashMap<String, Vec<ResourcePath>>,
    integrations: HashMap<(String, String, HttpMethod), Integration>,
}

/// Gateway backed by in-memory tables, preserving insertion order
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: RwLock<GatewayState>,
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an API
    pub fn add_api(&self, api: GatewayApi) {
        self.state.write().apis.push(api);
    }

    /// Add a resource path under an API
    pub fn add_resource(&self, api_id: &str, resource: ResourcePath) {
        self.state.write().resources.entry(api_id.to_string()).or_default().push(resource);
    }

    /// Bind an integration to a resource and method
    pub fn bind(&self, api_id: &str, resource_id: &str, method: HttpMethod, integration: Integration) {
        self.state
            .write()
            .integrations
            .insert((api_id.to_string(), resource_id.to_string(), method), integration);
    }

    /// Remove an integration binding; returns whether one was bound
    pub fn unbind(&self, api_id: &str, resource_id: &str, method: HttpMethod) -> bool {
        self.state
            .write()
            .integrations
            .remove(&(api_id.to_string(), resource_id.to_string(), method))
            .is_some()
    }

    /// Make every subsequent call fail with a gateway error
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of calls served so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin_call(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DiscoveryError::Gateway("gateway unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl GatewayInspector for MemoryGateway {
    async fn list_apis(&self) -> Result<Vec<GatewayApi>> {
        self.begin_call()?;
        Ok(self.state.read().apis.clone())
    }

    async fn list_resource_paths(&self, api_id: &str) -> Result<Vec<ResourcePath>> {
        self.begin_call()?;
        let state = self.state.read();

        if !state.apis.iter().any(|api| api.id == api_id) {
            return Err(DiscoveryError::Gateway(format!("Invalid API identifier specified: {}", api_id)));
        }

        Ok(state.resources.get(api_id).cloned().unwrap_or_default())
    }

    async fn get_integration(
        &self,
        api_id: &str,
        resource_id: &str,
        method: HttpMethod,
    ) -> Result<Option<Integration>> {
        self.begin_call()?;
        let integration = self
            .state
            .read()
            .integrations
            .get(&(api_id.to_string(), resource_id.to_string(), method))
            .cloned();

        if integration.is_none() {
            debug!(api_id, resource_id, method = %method, "No integration bound");
        }

        Ok(integration)
    }
}
