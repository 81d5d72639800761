use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDateTime};
use resources::config::AutoscalerConfig;
use resources::objects::metric_spec::PodsMetricSpec;
use resources::objects::metrics::PodSampleMap;
use resources::objects::Selector;

use crate::classifier::classify;
use crate::measurement::PodsMeasurement;
use crate::metrics_client::MetricsClient;
use crate::pod_lister::PodLister;
use crate::scale_target::ScaleTarget;

pub fn gather(
    spec: &PodsMetricSpec,
    target: &ScaleTarget,
    client: &dyn MetricsClient,
    lister: &dyn PodLister,
    cfg: &AutoscalerConfig,
    now: NaiveDateTime,
) -> Result<PodsMeasurement> {
    if spec.target.average_value.is_none() {
        return Err(anyhow!("invalid pods metric source: target must set averageValue"));
    }
    let metric_selector = Selector::parse_optional(spec.selector.as_deref())?;

    let (mut samples, timestamp) =
        client.raw_metric(&spec.metric_name, &target.namespace, &target.selector, &metric_selector)?;
    let pods = lister.list(&target.namespace, &target.selector)?;
    if pods.is_empty() {
        tracing::debug!("pods metric {} has no pods, reporting an empty measurement", spec.metric_name);
        return Ok(PodsMeasurement {
            samples: PodSampleMap::new(),
            ready: 0,
            ignored: vec![],
            missing: vec![],
            total_pods: 0,
            timestamp,
        });
    }

    let classification = classify(
        &pods,
        &samples,
        None,
        now,
        Duration::seconds(cfg.cpu_initialization_period),
        Duration::seconds(cfg.initial_readiness_delay),
    );
    tracing::debug!(
        "pods metric {} gathered: ready={}, ignored={}, missing={}",
        spec.metric_name,
        classification.ready,
        classification.ignored.len(),
        classification.missing.len()
    );
    for name in &classification.ignored {
        samples.remove(name);
    }

    Ok(PodsMeasurement {
        samples,
        ready: classification.ready,
        ignored: classification.ignored.into_iter().collect(),
        missing: classification.missing.into_iter().collect(),
        total_pods: pods.len() as u32,
        timestamp,
    })
}
