use std::collections::HashMap;

use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDateTime};
use resources::config::AutoscalerConfig;
use resources::objects::metric_spec::ResourceMetricSpec;

use crate::classifier::classify;
use crate::measurement::ResourceMeasurement;
use crate::metrics_client::MetricsClient;
use crate::pod_lister::PodLister;
use crate::scale_target::ScaleTarget;

pub fn gather(
    spec: &ResourceMetricSpec,
    target: &ScaleTarget,
    client: &dyn MetricsClient,
    lister: &dyn PodLister,
    cfg: &AutoscalerConfig,
    now: NaiveDateTime,
) -> Result<ResourceMeasurement> {
    let wants_utilization = spec.target.average_utilization.is_some();
    if !wants_utilization && spec.target.average_value.is_none() {
        return Err(anyhow!(
            "invalid resource metric source: target must set averageValue or averageUtilization"
        ));
    }

    let (mut samples, timestamp) = client.resource_metric(spec.name, &target.namespace, &target.selector)?;
    let pods = lister.list(&target.namespace, &target.selector)?;
    if pods.is_empty() {
        return Err(anyhow!("no pods"));
    }

    let classification = classify(
        &pods,
        &samples,
        Some(spec.name),
        now,
        Duration::seconds(cfg.cpu_initialization_period),
        Duration::seconds(cfg.initial_readiness_delay),
    );
    tracing::debug!(
        "resource {:?} gathered: ready={}, ignored={}, missing={}",
        spec.name,
        classification.ready,
        classification.ignored.len(),
        classification.missing.len()
    );
    for name in &classification.ignored {
        samples.remove(name);
    }

    let requests = if wants_utilization {
        let mut map = HashMap::new();
        for pod in &pods {
            if pod.is_terminating_or_failed() {
                continue;
            }
            let request = pod
                .total_request(spec.name)
                .ok_or_else(|| anyhow!("missing request for resource {} on pod {}", spec.name, pod.name))?;
            map.insert(pod.name.clone(), request);
        }
        Some(map)
    } else {
        None
    };

    Ok(ResourceMeasurement {
        samples,
        requests,
        ready: classification.ready,
        ignored: classification.ignored.into_iter().collect(),
        missing: classification.missing.into_iter().collect(),
        total_pods: pods.len() as u32,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use resources::objects::metric_spec::MetricTarget;
    use resources::objects::metrics::{MilliValue, PodSampleMap, Resource};
    use resources::objects::pod::PodRecord;
    use resources::objects::Selector;

    struct StubClient(PodSampleMap, NaiveDateTime);
    impl MetricsClient for StubClient {
        fn raw_metric(
            &self, _: &str, _: &str, _: &Selector, _: &Selector,
        ) -> Result<(PodSampleMap, NaiveDateTime)> {
            unimplemented!()
        }
        fn resource_metric(
            &self, _: Resource, _: &str, _: &Selector,
        ) -> Result<(PodSampleMap, NaiveDateTime)> {
            Ok((self.0.clone(), self.1))
        }
        fn object_metric(
            &self, _: &str, _: &str, _: &resources::objects::object_reference::ObjectReference, _: &Selector,
        ) -> Result<(i64, NaiveDateTime)> {
            unimplemented!()
        }
        fn external_metric(&self, _: &str, _: &str, _: &Selector) -> Result<(Vec<i64>, NaiveDateTime)> {
            unimplemented!()
        }
    }

    struct StubLister(Vec<PodRecord>);
    impl PodLister for StubLister {
        fn list(&self, _: &str, _: &Selector) -> Result<Vec<PodRecord>> {
            Ok(self.0.clone())
        }
    }

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn rejects_target_without_average_shape() {
        let spec = ResourceMetricSpec { name: Resource::CPU, target: MetricTarget { value: Some(MilliValue(1)), ..Default::default() } };
        let target = ScaleTarget { namespace: "default".into(), name: "web".into(), replicas: 1, selector: Selector::default() };
        let err = gather(&spec, &target, &StubClient(PodSampleMap::new(), now()), &StubLister(vec![]), &AutoscalerConfig::default(), now())
            .unwrap_err();
        assert!(err.to_string().contains("averageValue or averageUtilization"));
    }

    #[test]
    fn fails_when_no_pods_listed() {
        let spec = ResourceMetricSpec { name: Resource::CPU, target: MetricTarget { average_value: Some(MilliValue(1)), ..Default::default() } };
        let target = ScaleTarget { namespace: "default".into(), name: "web".into(), replicas: 1, selector: Selector::default() };
        let err = gather(&spec, &target, &StubClient(PodSampleMap::new(), now()), &StubLister(vec![]), &AutoscalerConfig::default(), now())
            .unwrap_err();
        assert_eq!(err.to_string(), "no pods");
    }
}
