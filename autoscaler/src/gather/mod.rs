//! The gatherer facade (§4.4): dispatches each spec to its per-source
//! gatherer, resolves `currentReplicas` from the scale target, and enforces
//! the all-or-some failure policy.

pub mod external;
pub mod object;
pub mod pods;
pub mod resource;

use anyhow::Result;
use chrono::NaiveDateTime;
use resources::config::AutoscalerConfig;
use resources::objects::metric_spec::MetricSpec;
use resources::objects::pod::{ConditionStatus, PodPhase, PodRecord};

use crate::facade::collect_or_fail;
use crate::measurement::{GatheredMetric, Measurement};
use crate::metrics_client::MetricsClient;
use crate::pod_lister::PodLister;
use crate::scale_target::ScaleTarget;

pub fn gather_all(
    specs: &[MetricSpec],
    target: &ScaleTarget,
    client: &dyn MetricsClient,
    lister: &dyn PodLister,
    cfg: &AutoscalerConfig,
    now: NaiveDateTime,
) -> Result<Vec<GatheredMetric>> {
    tracing::info!(
        "gathering {} metric(s) for {}/{}",
        specs.len(),
        target.namespace,
        target.name
    );
    let results: Vec<Result<GatheredMetric>> = specs
        .iter()
        .map(|spec| gather_one(spec, target, client, lister, cfg, now))
        .collect();
    collect_or_fail(results, "metrics")
}

fn gather_one(
    spec: &MetricSpec,
    target: &ScaleTarget,
    client: &dyn MetricsClient,
    lister: &dyn PodLister,
    cfg: &AutoscalerConfig,
    now: NaiveDateTime,
) -> Result<GatheredMetric> {
    let measurement = match spec {
        MetricSpec::Resource(s) => Measurement::Resource(resource::gather(s, target, client, lister, cfg, now)?),
        MetricSpec::Pods(s) => Measurement::Pods(pods::gather(s, target, client, lister, cfg, now)?),
        MetricSpec::Object(s) => Measurement::Object(object::gather(s, target, client, lister)?),
        MetricSpec::External(s) => Measurement::External(external::gather(s, target, client, lister)?),
    };
    Ok(GatheredMetric { spec: spec.clone(), current_replicas: target.replicas, measurement })
}

/// Shared by the Object and External gatherers: pods counted as ready for a
/// `Value`/`AverageUtilization` target (phase Running, Ready condition True).
pub(super) fn count_ready(pods: &[PodRecord]) -> u32 {
    pods.iter()
        .filter(|pod| {
            pod.phase == PodPhase::Running
                && pod.ready.map(|ready| ready.status == ConditionStatus::True).unwrap_or(false)
        })
        .count() as u32
}
