//! Configuration loading. `metrics_api_url` comes from the `config` crate's
//! usual file+environment layering (teacher pattern); the four knobs the
//! external interface names (§6) are spec-mandated exact-cased environment
//! variables (`metrics`, `tolerance`, `cpuInitializationPeriod`,
//! `initialReadinessDelay`) that don't fit `config`-rs's lowercase
//! environment-matching, so they're parsed by hand on top of it.

use std::env;

use anyhow::{Context, Result};
use resources::config::AutoscalerConfig;
use resources::objects::metric_spec::MetricSpec;

pub fn load() -> Result<AutoscalerConfig> {
    let mut cfg = ::config::Config::builder()
        .add_source(::config::File::with_name("config").required(false))
        .add_source(::config::Environment::default())
        .build()
        .context("failed to build configuration")?
        .try_deserialize::<AutoscalerConfig>()
        .unwrap_or_default();

    if let Ok(raw) = env::var("tolerance") {
        cfg.tolerance = raw.parse().context("invalid tolerance environment variable")?;
    }
    if let Ok(raw) = env::var("cpuInitializationPeriod") {
        cfg.cpu_initialization_period = raw.parse().context("invalid cpuInitializationPeriod environment variable")?;
    }
    if let Ok(raw) = env::var("initialReadinessDelay") {
        cfg.initial_readiness_delay = raw.parse().context("invalid initialReadinessDelay environment variable")?;
    }

    Ok(cfg)
}

/// Parses the `metrics` environment variable: a YAML or JSON list of metric
/// specs, required on every invocation.
pub fn load_metric_specs() -> Result<Vec<MetricSpec>> {
    let raw = env::var("metrics").context("metrics environment variable is required")?;
    serde_yaml::from_str(&raw).context("failed to parse metrics environment variable")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_metric_specs_parses_yaml_list() {
        env::set_var(
            "metrics",
            "- type: Pods\n  metricName: queries-per-second\n  target:\n    averageValue: 10000\n",
        );
        let specs = load_metric_specs().unwrap();
        assert_eq!(specs.len(), 1);
        env::remove_var("metrics");
    }

    #[test]
    fn load_metric_specs_requires_the_variable() {
        env::remove_var("metrics");
        assert!(load_metric_specs().is_err());
    }
}
