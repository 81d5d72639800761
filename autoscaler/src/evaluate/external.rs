use anyhow::{anyhow, Result};
use resources::config::AutoscalerConfig;
use resources::objects::metric_spec::ExternalMetricSpec;

use crate::measurement::ExternalMeasurement;
use crate::ratio::{per_pod_average_replicas, usage_ratio_replicas};

/// Deliberate deviation from the source's flagged bug (SPEC_FULL.md §9,
/// DESIGN.md): the averageUtilization branch reads this variant's own
/// `averageUtilization` field rather than `target.value`.
pub fn evaluate(
    spec: &ExternalMetricSpec,
    measurement: &ExternalMeasurement,
    current_replicas: u32,
    cfg: &AutoscalerConfig,
) -> Result<i32> {
    if let Some(average_utilization_target) = spec.target.average_utilization {
        let ready_pod_count = measurement.ready_pod_count.ok_or_else(|| {
            anyhow!("invalid external evaluation: measurement is missing ready pod count for an averageUtilization target")
        })?;
        let ratio = measurement.utilization as f64 / average_utilization_target.as_f64();
        tracing::debug!("external metric {} evaluating by average utilization, ratio={ratio}", spec.metric_name);
        return Ok(usage_ratio_replicas(current_replicas, ratio, ready_pod_count, cfg.tolerance));
    }

    if let Some(average_value_target) = spec.target.average_value {
        tracing::debug!("external metric {} evaluating by per-pod average", spec.metric_name);
        return Ok(per_pod_average_replicas(
            measurement.utilization,
            average_value_target.milli_value(),
            current_replicas,
            cfg.tolerance,
        ));
    }

    Err(anyhow!("invalid external evaluation: target must set averageValue or averageUtilization"))
}
