//! Function registry capability
//!
//! The registry holds deployed function metadata. Discovery only needs the
//! logical name and the platform-unique identifier (the function ARN).

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A registered function as returned by a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSummary {
    /// Logical function name
    pub name: String,
    /// Platform-unique identifier
    pub arn: String,
}

/// Identity of a single function, fetched once per resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionIdentity {
    pub name: String,
    pub arn: String,
}

impl FunctionIdentity {
    pub fn new(name: impl Into<String>, arn: impl Into<String>) -> Self {
        Self { name: name.into(), arn: arn.into() }
    }
}

impl From<FunctionSummary> for FunctionIdentity {
    fn from(summary: FunctionSummary) -> Self {
        Self { name: summary.name, arn: summary.arn }
    }
}

/// Read access to the platform's function registry
#[async_trait]
pub trait FunctionRegistry: Send + Sync + fmt::Debug {
    /// List every registered function, following all pages
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::Registry` if the registry cannot be reached
    async fn list_functions(&self) -> Result<Vec<FunctionSummary>>;

    /// Fetch a single function by logical name
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::FunctionNotFound` if no function has this name,
    /// or `DiscoveryError::Registry` on communication failures
    async fn get_function(&self, name: &str) -> Result<FunctionIdentity>;
}
