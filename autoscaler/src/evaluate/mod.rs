//! The evaluator facade (§4.6): dispatches each gathered metric to its
//! per-source evaluator, aggregates by maximum, and enforces the all-or-some
//! failure policy.

pub mod external;
pub mod object;
pub mod pods;
pub mod resource;

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use resources::config::AutoscalerConfig;
use resources::objects::metric_spec::MetricSpec;

use crate::facade::collect_or_fail;
use crate::measurement::{GatheredMetric, Measurement};

pub fn evaluate_all(
    metrics: &[GatheredMetric],
    current_replicas: u32,
    cfg: &AutoscalerConfig,
    now: NaiveDateTime,
) -> Result<i32> {
    if metrics.is_empty() {
        return Err(anyhow!("invalid evaluations (0 invalid out of 0), first error is: no metrics supplied"));
    }
    tracing::info!("evaluating {} gathered metric(s), current replicas={current_replicas}", metrics.len());
    let results: Vec<Result<i32>> = metrics.iter().map(|metric| evaluate_one(metric, current_replicas, cfg, now)).collect();
    let evaluations = collect_or_fail(results, "evaluations")?;
    let target_replicas = evaluations.into_iter().max().expect("collect_or_fail returns a non-empty vec on success");
    tracing::info!("max-aggregated target replicas={target_replicas}");
    Ok(target_replicas)
}

fn evaluate_one(metric: &GatheredMetric, current_replicas: u32, cfg: &AutoscalerConfig, now: NaiveDateTime) -> Result<i32> {
    match (&metric.spec, &metric.measurement) {
        (MetricSpec::Resource(spec), Measurement::Resource(measurement)) => {
            resource::evaluate(spec, measurement, current_replicas, cfg, now)
        }
        (MetricSpec::Pods(spec), Measurement::Pods(measurement)) => {
            pods::evaluate(spec, measurement, current_replicas, cfg, now)
        }
        (MetricSpec::Object(spec), Measurement::Object(measurement)) => {
            object::evaluate(spec, measurement, current_replicas, cfg)
        }
        (MetricSpec::External(spec), Measurement::External(measurement)) => {
            external::evaluate(spec, measurement, current_replicas, cfg)
        }
        _ => Err(anyhow!("unknown metric source type \"{}\"", metric.spec.kind_name())),
    }
}
