//! Error types for Lambda endpoint discovery

use thiserror::Error;

/// Result type for discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Errors that can occur while resolving a function endpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// The function registry has no function with this name
    #[error("Function not found: {0}")]
    FunctionNotFound(String),

    /// The function exists but no gateway integration targets it
    #[error("No gateway endpoint for function: {0}")]
    NoEndpoint(String),

    /// Malformed service id, method token or function name
    #[error("Invalid service id: {0}")]
    InvalidServiceId(String),

    /// Error communicating with the function registry
    #[error("Function registry error: {0}")]
    Registry(String),

    /// Error communicating with the gateway
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DiscoveryError {
    /// Whether the error means there is nothing to discover for the name,
    /// as opposed to a fault while looking
    pub fn is_not_found(&self) -> bool {
        matches!(self, DiscoveryError::FunctionNotFound(_) | DiscoveryError::NoEndpoint(_))
    }

    /// Whether the error was raised by one of the remote collaborators
    pub fn is_transport(&self) -> bool {
        matches!(self, DiscoveryError::Registry(_) | DiscoveryError::Gateway(_))
    }

    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            DiscoveryError::FunctionNotFound(_) => "function_not_found",
            DiscoveryError::NoEndpoint(_) => "no_endpoint",
            DiscoveryError::InvalidServiceId(_) => "invalid_service_id",
            DiscoveryError::Registry(_) => "registry_error",
            DiscoveryError::Gateway(_) => "gateway_error",
            DiscoveryError::Config(_) => "config_error",
        }
    }
}
