use std::collections::HashSet;

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use resources::config::AutoscalerConfig;
use resources::objects::metric_spec::PodsMetricSpec;

use crate::measurement::PodsMeasurement;
use crate::ratio::plain_metric_mode;

/// Applies the same tolerance/correction as Resource/AverageValue (§9, "Pods
/// source tolerance"), resolving an ambiguity the original left open.
pub fn evaluate(
    spec: &PodsMetricSpec,
    measurement: &PodsMeasurement,
    current_replicas: u32,
    cfg: &AutoscalerConfig,
    now: NaiveDateTime,
) -> Result<i32> {
    let target = spec
        .target
        .average_value
        .ok_or_else(|| anyhow!("invalid pods evaluation: target must set averageValue"))?;
    let missing: HashSet<String> = measurement.missing.iter().cloned().collect();
    let ignored: HashSet<String> = measurement.ignored.iter().cloned().collect();
    tracing::debug!("pods metric {} evaluating against target={}", spec.metric_name, target.milli_value());
    Ok(plain_metric_mode(
        &measurement.samples,
        target.milli_value(),
        measurement.ready,
        &missing,
        &ignored,
        current_replicas,
        cfg.tolerance,
        now,
    ))
}
