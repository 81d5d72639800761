use serde::{Deserialize, Serialize};

/// Settings shared by both CLI stages. `metrics_api_url` is the only knob a
/// config file is realistically used for; `tolerance`, `cpu_initialization_period`
/// and `initial_readiness_delay` are normally supplied via the exact-cased
/// environment variables the external interface names (`tolerance`,
/// `cpuInitializationPeriod`, `initialReadinessDelay`) rather than through
/// this struct's own camelCase field names — see `autoscaler::config::load`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoscalerConfig {
    /// Base URL of the metrics/pod-listing collaborator.
    pub metrics_api_url: String,
    /// Half-width of the dead band around a usage ratio of 1.0.
    pub tolerance: f64,
    /// CPU grace window, in seconds, during which a pod's CPU sample is
    /// gated by the classifier's timing rules.
    pub cpu_initialization_period: i64,
    /// Initial-readiness grace window, in seconds.
    pub initial_readiness_delay: i64,
}

impl Default for AutoscalerConfig {
    fn default() -> Self {
        AutoscalerConfig {
            metrics_api_url: "http://localhost:8080".to_string(),
            tolerance: 0.1,
            cpu_initialization_period: 300,
            initial_readiness_delay: 30,
        }
    }
}
