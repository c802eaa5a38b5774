//! Configuration types for Lambda endpoint discovery

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::{DiscoveryError, Result};

/// Environment variable prefix, e.g. `LAMBDA_DISCOVERY__REGION=eu-west-1`
pub const ENV_PREFIX: &str = "LAMBDA_DISCOVERY";

/// Discovery configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Region the functions and gateway APIs live in
    #[serde(default = "default_region")]
    pub region: String,

    /// Logging and metrics settings
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self { region: default_region(), observability: ObservabilityConfig::default() }
    }
}

/// Logging and metrics configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level or filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON
    #[serde(default)]
    pub json_logs: bool,

    /// Record Prometheus metrics
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl DiscoveryConfig {
    /// Load configuration from a file and the environment
    ///
    /// Layers, lowest precedence first:
    /// 1. serde defaults
    /// 2. the config file, if it exists
    /// 3. `LAMBDA_DISCOVERY__*` environment variables
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let builder =
            config::Config::builder().add_source(config::File::from(path.as_ref()).required(false));

        let builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| DiscoveryError::Config(format!("Failed to build config: {}", e)))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| DiscoveryError::Config(format!("Failed to deserialize config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults on any error
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => {
                tracing::info!("Configuration loaded successfully from {:?}", path.as_ref());
                config
            },
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Failed to load config from {:?}. Using defaults.",
                    path.as_ref()
                );
                Self::default()
            },
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.region.is_empty() {
            return Err(DiscoveryError::Config("region must not be empty".to_string()));
        }

        let region_ok = self
            .region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !region_ok || self.region.starts_with('-') || self.region.ends_with('-') {
            return Err(DiscoveryError::Config(format!(
                "Invalid region '{}'. Expected a region code such as 'us-east-1'",
                self.region
            )));
        }

        if EnvFilter::try_new(&self.observability.log_level).is_err() {
            return Err(DiscoveryError::Config(format!(
                "Invalid log level '{}'",
                self.observability.log_level
            )));
        }

        Ok(())
    }
}
