use std::collections::HashSet;

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use resources::config::AutoscalerConfig;
use resources::objects::metric_spec::ResourceMetricSpec;

use crate::measurement::ResourceMeasurement;
use crate::ratio::{plain_metric_mode, utilization_ratio_mode};

pub fn evaluate(
    spec: &ResourceMetricSpec,
    measurement: &ResourceMeasurement,
    current_replicas: u32,
    cfg: &AutoscalerConfig,
    now: NaiveDateTime,
) -> Result<i32> {
    let missing: HashSet<String> = measurement.missing.iter().cloned().collect();
    let ignored: HashSet<String> = measurement.ignored.iter().cloned().collect();

    if let Some(average_utilization) = spec.target.average_utilization {
        let requests = measurement
            .requests
            .as_ref()
            .ok_or_else(|| anyhow!("invalid resource evaluation: measurement is missing per-pod requests"))?;
        // averageUtilization is a percentage encoded in milli-units, e.g. 50000 == 50%.
        let target_fraction = average_utilization.as_f64() / 1000.0 / 100.0;
        tracing::debug!("resource {:?} evaluating by utilization, target fraction={target_fraction}", spec.name);
        return utilization_ratio_mode(
            &measurement.samples,
            requests,
            target_fraction,
            measurement.ready,
            &missing,
            &ignored,
            current_replicas,
            cfg.tolerance,
            now,
        );
    }

    if let Some(average_value) = spec.target.average_value {
        tracing::debug!("resource {:?} evaluating by average value={}", spec.name, average_value.milli_value());
        return Ok(plain_metric_mode(
            &measurement.samples,
            average_value.milli_value(),
            measurement.ready,
            &missing,
            &ignored,
            current_replicas,
            cfg.tolerance,
            now,
        ));
    }

    Err(anyhow!("invalid resource evaluation: target set neither averageValue nor averageUtilization"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use resources::objects::metric_spec::MetricTarget;
    use resources::objects::metrics::{MilliValue, PodSample, PodSampleMap, Resource};
    use std::collections::HashMap;

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn measurement(samples: PodSampleMap, requests: Option<HashMap<String, i64>>, ready: u32) -> ResourceMeasurement {
        ResourceMeasurement { samples, requests, ready, ignored: vec![], missing: vec![], total_pods: ready, timestamp: now() }
    }

    #[test]
    fn average_utilization_converts_milli_percent_to_target_fraction() {
        // 50000 milli-units == 50% == a 0.5 target fraction. Pods using
        // exactly half their request should be judged at the target and held
        // at the current replica count.
        let mut samples = PodSampleMap::new();
        samples.insert("a".into(), PodSample { value: 50, timestamp: now(), window_seconds: 0 });
        let mut requests = HashMap::new();
        requests.insert("a".to_string(), 100);
        let spec = ResourceMetricSpec {
            name: Resource::CPU,
            target: MetricTarget { average_utilization: Some(MilliValue(50_000)), ..Default::default() },
        };
        let result = evaluate(&spec, &measurement(samples, Some(requests), 1), 1, &AutoscalerConfig { tolerance: 0.0, ..AutoscalerConfig::default() }, now())
            .unwrap();
        assert_eq!(result, 1);
    }

    #[test]
    fn average_utilization_above_target_scales_up() {
        let mut samples = PodSampleMap::new();
        samples.insert("a".into(), PodSample { value: 100, timestamp: now(), window_seconds: 0 });
        let mut requests = HashMap::new();
        requests.insert("a".to_string(), 100);
        let spec = ResourceMetricSpec {
            name: Resource::CPU,
            target: MetricTarget { average_utilization: Some(MilliValue(50_000)), ..Default::default() },
        };
        let result = evaluate(&spec, &measurement(samples, Some(requests), 1), 1, &AutoscalerConfig { tolerance: 0.0, ..AutoscalerConfig::default() }, now())
            .unwrap();
        assert_eq!(result, 2);
    }

    #[test]
    fn average_utilization_without_requests_is_an_error() {
        let spec = ResourceMetricSpec {
            name: Resource::CPU,
            target: MetricTarget { average_utilization: Some(MilliValue(50_000)), ..Default::default() },
        };
        let err = evaluate(&spec, &measurement(PodSampleMap::new(), None, 0), 1, &AutoscalerConfig::default(), now()).unwrap_err();
        assert!(err.to_string().contains("missing per-pod requests"));
    }

    #[test]
    fn target_with_neither_shape_set_is_an_error() {
        let spec = ResourceMetricSpec { name: Resource::CPU, target: MetricTarget::default() };
        let err = evaluate(&spec, &measurement(PodSampleMap::new(), None, 0), 1, &AutoscalerConfig::default(), now()).unwrap_err();
        assert!(err.to_string().contains("neither averageValue nor averageUtilization"));
    }
}
