//! Service discovery for AWS Lambda functions exposed through API Gateway
//!
//! Maps a function's logical name to the one URL that reaches it from
//! outside: the API Gateway route whose integration invokes the function.
//!
//! # Collaborators
//!
//! - [`FunctionRegistry`]: function names and ARNs (AWS Lambda)
//! - [`GatewayInspector`]: APIs, resource paths and integrations (API Gateway)
//!
//! In-memory implementations live in [`memory`]; AWS SDK implementations in
//! `aws` (feature `aws`, on by default).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lambda_discovery::{
//!     DiscoveryClient, DiscoveryConfig, LambdaDiscoveryClient, MemoryFunctionRegistry,
//!     MemoryGateway,
//! };
//!
//! # async fn run() -> lambda_discovery::Result<()> {
//! let metrics_registry = prometheus::Registry::new();
//! let client = LambdaDiscoveryClient::from_config(
//!     Arc::new(MemoryFunctionRegistry::new()),
//!     Arc::new(MemoryGateway::new()),
//!     &DiscoveryConfig::default(),
//!     &metrics_registry,
//! )?;
//!
//! for instance in client.instances("uppercase:GET,POST").await? {
//!     println!("found: {}", instance.uri);
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "aws")]
pub mod aws;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod memory;
pub mod metrics;
pub mod registry;
pub mod resolver;
pub mod service_id;

#[cfg(feature = "aws")]
pub use aws::{ApiGatewayInspector, LambdaFunctionRegistry};
pub use client::{DiscoveryClient, LambdaDiscoveryClient};
pub use config::{DiscoveryConfig, ObservabilityConfig};
pub use endpoint::{DEPLOYMENT_STAGE, ResolvedEndpoint, ServiceInstance};
pub use error::{DiscoveryError, Result};
pub use gateway::{GatewayApi, GatewayInspector, Integration, ResourcePath};
pub use memory::{MemoryFunctionRegistry, MemoryGateway};
pub use metrics::DiscoveryMetrics;
pub use registry::{FunctionIdentity, FunctionRegistry, FunctionSummary};
pub use resolver::EndpointResolver;
pub use service_id::{DEFAULT_METHODS, HttpMethod, MethodFilter, ServiceId};
