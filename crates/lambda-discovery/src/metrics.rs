//! Prometheus metrics for endpoint resolution

use std::fmt;

use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};

/// Discovery metrics
#[derive(Clone)]
pub struct DiscoveryMetrics {
    /// Resolutions by outcome
    pub resolutions: IntCounterVec,
    /// Integration probes by outcome (bound or absent)
    pub integration_probes: IntCounterVec,
    /// Resolutions where more than one distinct URL matched
    pub ambiguous_resolutions: IntCounter,
    /// Wall time of a full resolution
    pub resolve_duration: Histogram,
}

impl DiscoveryMetrics {
    /// Create and register discovery metrics
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let resolutions = IntCounterVec::new(
            Opts::new(
                "lambda_discovery_resolutions_total",
                "Total number of endpoint resolutions",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(resolutions.clone()))?;

        let integration_probes = IntCounterVec::new(
            Opts::new(
                "lambda_discovery_integration_probes_total",
                "Total number of gateway integration probes",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(integration_probes.clone()))?;

        let ambiguous_resolutions = IntCounter::new(
            "lambda_discovery_ambiguous_resolutions_total",
            "Total number of resolutions that matched more than one endpoint",
        )?;
        registry.register(Box::new(ambiguous_resolutions.clone()))?;

        let resolve_duration = Histogram::with_opts(HistogramOpts::new(
            "lambda_discovery_resolve_duration_seconds",
            "Time spent resolving a function endpoint",
        ))?;
        registry.register(Box::new(resolve_duration.clone()))?;

        Ok(Self { resolutions, integration_probes, ambiguous_resolutions, resolve_duration })
    }

    /// Record the outcome of a resolution, e.g. "success" or "no_endpoint"
    pub fn record_resolution(&self, outcome: &str, seconds: f64) {
        self.resolutions.with_label_values(&[outcome]).inc();
        self.resolve_duration.observe(seconds);
    }

    /// Record one integration probe
    pub fn record_probe(&self, bound: bool) {
        let outcome = if bound { "bound" } else { "absent" };
        self.integration_probes.with_label_values(&[outcome]).inc();
    }

    /// Record an ambiguous resolution
    pub fn record_ambiguous(&self) {
        self.ambiguous_resolutions.inc();
    }
}

impl fmt::Debug for DiscoveryMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveryMetrics").finish_non_exhaustive()
    }
}
