use anyhow::{anyhow, Result};
use resources::config::AutoscalerConfig;
use resources::objects::metric_spec::ObjectMetricSpec;

use crate::measurement::ObjectMeasurement;
use crate::ratio::{per_pod_average_replicas, usage_ratio_replicas};

pub fn evaluate(
    spec: &ObjectMetricSpec,
    measurement: &ObjectMeasurement,
    current_replicas: u32,
    cfg: &AutoscalerConfig,
) -> Result<i32> {
    if let Some(value_target) = spec.target.value {
        let ready_pod_count = measurement
            .ready_pod_count
            .ok_or_else(|| anyhow!("invalid object evaluation: measurement is missing ready pod count for a value target"))?;
        let ratio = measurement.utilization as f64 / value_target.as_f64();
        tracing::debug!("object metric {} evaluating by value, ratio={ratio}", spec.metric_name);
        return Ok(usage_ratio_replicas(current_replicas, ratio, ready_pod_count, cfg.tolerance));
    }

    if let Some(average_value_target) = spec.target.average_value {
        tracing::debug!("object metric {} evaluating by per-pod average", spec.metric_name);
        return Ok(per_pod_average_replicas(
            measurement.utilization,
            average_value_target.milli_value(),
            current_replicas,
            cfg.tolerance,
        ));
    }

    Err(anyhow!(
        "invalid object evaluation: neither a value target nor an average value target was set"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use resources::objects::metric_spec::MetricTarget;
    use resources::objects::metrics::MilliValue;
    use resources::objects::object_reference::ObjectReference;

    fn now() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn spec(target: MetricTarget) -> ObjectMetricSpec {
        ObjectMetricSpec {
            metric_name: "queue-depth".to_string(),
            selector: None,
            described_object: ObjectReference { kind: "Ingress".to_string(), name: "api".to_string(), namespace: String::new() },
            target,
        }
    }

    #[test]
    fn value_target_dispatches_to_usage_ratio() {
        let measurement = ObjectMeasurement { utilization: 20, ready_pod_count: Some(2), timestamp: now() };
        let target = MetricTarget { value: Some(MilliValue(10)), ..Default::default() };
        let cfg = AutoscalerConfig { tolerance: 0.0, ..AutoscalerConfig::default() };
        let result = evaluate(&spec(target), &measurement, 2, &cfg).unwrap();
        assert_eq!(result, 4);
    }

    #[test]
    fn value_target_without_ready_pod_count_is_an_error() {
        let measurement = ObjectMeasurement { utilization: 20, ready_pod_count: None, timestamp: now() };
        let target = MetricTarget { value: Some(MilliValue(10)), ..Default::default() };
        let err = evaluate(&spec(target), &measurement, 2, &AutoscalerConfig::default()).unwrap_err();
        assert!(err.to_string().contains("missing ready pod count"));
    }

    #[test]
    fn average_value_target_dispatches_to_per_pod_average() {
        let measurement = ObjectMeasurement { utilization: 400, ready_pod_count: None, timestamp: now() };
        let target = MetricTarget { average_value: Some(MilliValue(50)), ..Default::default() };
        let cfg = AutoscalerConfig { tolerance: 0.0, ..AutoscalerConfig::default() };
        let result = evaluate(&spec(target), &measurement, 4, &cfg).unwrap();
        assert_eq!(result, 8);
    }

    #[test]
    fn target_with_neither_shape_set_is_an_error() {
        let measurement = ObjectMeasurement { utilization: 0, ready_pod_count: None, timestamp: now() };
        let err = evaluate(&spec(MetricTarget::default()), &measurement, 1, &AutoscalerConfig::default()).unwrap_err();
        assert!(err.to_string().contains("neither a value target nor an average value target"));
    }
}
