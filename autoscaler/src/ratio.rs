//! The usage-ratio arithmetic shared by every per-source evaluator: turning
//! noisy, partial per-pod samples into a target replica count without
//! letting missing or still-initializing pods flip the scaling direction.

use std::collections::{HashMap, HashSet};

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use resources::objects::metrics::PodSample;
use resources::objects::metrics::PodSampleMap;

fn synthetic_sample(value: i64, now: NaiveDateTime) -> PodSample {
    PodSample {
        value,
        timestamp: now,
        window_seconds: 0,
    }
}

fn usage_ratio(samples: &PodSampleMap, target: i64) -> f64 {
    if samples.is_empty() || target == 0 {
        return 1.0;
    }
    let total: i64 = samples.values().map(|sample| sample.value).sum();
    (total as f64) / (samples.len() as f64 * target as f64)
}

fn direction_flipped(base_ratio: f64, corrected_ratio: f64) -> bool {
    (1.0 - base_ratio).signum() != (1.0 - corrected_ratio).signum()
}

/// Fill value for a missing pod: pessimistic (100% of target) on scale-down,
/// optimistic (0) on scale-up, no fill at all when the base ratio is
/// already exactly 1.0.
fn missing_fill_value(base_ratio: f64, on_scale_down: i64) -> Option<i64> {
    if base_ratio < 1.0 {
        Some(on_scale_down)
    } else if base_ratio > 1.0 {
        Some(0)
    } else {
        None
    }
}

/// Plain-metric mode (§4.2.1): used by the Pods source and Resource's
/// AverageValue target. `samples` must already have ignored pods' entries
/// removed by the caller.
#[allow(clippy::too_many_arguments)]
pub fn plain_metric_mode(
    samples: &PodSampleMap,
    target: i64,
    ready: u32,
    missing: &HashSet<String>,
    ignored: &HashSet<String>,
    current_replicas: u32,
    tolerance: f64,
    now: NaiveDateTime,
) -> i32 {
    let base_ratio = usage_ratio(samples, target);
    tracing::debug!("plain metric mode: base ratio={base_ratio}");
    let rebalance_ignored = !ignored.is_empty() && base_ratio > 1.0;

    if !rebalance_ignored && missing.is_empty() {
        if (1.0 - base_ratio).abs() <= tolerance {
            return current_replicas as i32;
        }
        return (base_ratio * ready as f64).ceil() as i32;
    }

    let mut augmented = samples.clone();
    if let Some(fill) = missing_fill_value(base_ratio, target) {
        for name in missing {
            augmented.insert(name.clone(), synthetic_sample(fill, now));
        }
    }
    if rebalance_ignored {
        for name in ignored {
            augmented.insert(name.clone(), synthetic_sample(0, now));
        }
    }

    let corrected_ratio = usage_ratio(&augmented, target);
    tracing::debug!("plain metric mode: corrected ratio={corrected_ratio} (missing/ignored pods filled in)");
    if (1.0 - corrected_ratio).abs() <= tolerance || direction_flipped(base_ratio, corrected_ratio) {
        return current_replicas as i32;
    }
    (corrected_ratio * augmented.len() as f64).ceil() as i32
}

fn utilization_ratio(
    samples: &PodSampleMap,
    requests: &HashMap<String, i64>,
    target_utilization_fraction: f64,
) -> Result<f64> {
    if samples.is_empty() {
        return Ok(1.0);
    }
    let mut sample_total = 0i64;
    let mut request_total = 0i64;
    let mut matched_any = false;
    for (name, sample) in samples {
        if let Some(request) = requests.get(name) {
            matched_any = true;
            sample_total += sample.value;
            request_total += request;
        }
    }
    if !matched_any {
        return Err(anyhow!(
            "no sample in the augmented map matches any known pod request"
        ));
    }
    if request_total == 0 || target_utilization_fraction == 0.0 {
        return Ok(1.0);
    }
    Ok((sample_total as f64 / request_total as f64) / target_utilization_fraction)
}

/// Utilization-ratio mode (§4.2.2): Resource/AverageUtilization. `target_utilization_fraction`
/// is the target expressed as a fraction of request (e.g. `0.5` for 50%).
#[allow(clippy::too_many_arguments)]
pub fn utilization_ratio_mode(
    samples: &PodSampleMap,
    requests: &HashMap<String, i64>,
    target_utilization_fraction: f64,
    ready: u32,
    missing: &HashSet<String>,
    ignored: &HashSet<String>,
    current_replicas: u32,
    tolerance: f64,
    now: NaiveDateTime,
) -> Result<i32> {
    let base_ratio = utilization_ratio(samples, requests, target_utilization_fraction)?;
    tracing::debug!("utilization ratio mode: base ratio={base_ratio}");
    let rebalance_ignored = !ignored.is_empty() && base_ratio > 1.0;

    if !rebalance_ignored && missing.is_empty() {
        if (1.0 - base_ratio).abs() <= tolerance {
            return Ok(current_replicas as i32);
        }
        return Ok((base_ratio * ready as f64).ceil() as i32);
    }

    let mut augmented = samples.clone();
    for name in missing {
        let request = *requests.get(name).unwrap_or(&0);
        if let Some(fill) = missing_fill_value(base_ratio, request) {
            augmented.insert(name.clone(), synthetic_sample(fill, now));
        }
    }
    if rebalance_ignored {
        for name in ignored {
            augmented.insert(name.clone(), synthetic_sample(0, now));
        }
    }

    let corrected_ratio = utilization_ratio(&augmented, requests, target_utilization_fraction)?;
    tracing::debug!("utilization ratio mode: corrected ratio={corrected_ratio} (missing/ignored pods filled in)");
    if (1.0 - corrected_ratio).abs() <= tolerance || direction_flipped(base_ratio, corrected_ratio) {
        return Ok(current_replicas as i32);
    }
    Ok((corrected_ratio * augmented.len() as f64).ceil() as i32)
}

/// Usage-ratio-replica helper (§4.2.3): Object/Value and External/AverageUtilization.
pub fn usage_ratio_replicas(current_replicas: u32, ratio: f64, ready_pods: u32, tolerance: f64) -> i32 {
    if current_replicas == 0 {
        return ratio.ceil() as i32;
    }
    if (1.0 - ratio).abs() <= tolerance {
        return current_replicas as i32;
    }
    (ratio * ready_pods as f64).ceil() as i32
}

/// Per-pod averaging (§4.2.4): Object/AverageValue and External/AverageValue.
pub fn per_pod_average_replicas(utilization: i64, target: i64, current_replicas: u32, tolerance: f64) -> i32 {
    if target == 0 {
        return current_replicas as i32;
    }
    let ratio = utilization as f64 / (target as f64 * current_replicas.max(1) as f64);
    if (1.0 - ratio).abs() > tolerance {
        (utilization as f64 / target as f64).ceil() as i32
    } else {
        current_replicas as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn sample(value: i64) -> PodSample {
        synthetic_sample(value, now())
    }

    #[test]
    fn beyond_tolerance_no_missing() {
        let mut samples = PodSampleMap::new();
        samples.insert("a".into(), sample(20));
        samples.insert("b".into(), sample(20));
        let mut requests = HashMap::new();
        requests.insert("a".to_string(), 10);
        requests.insert("b".to_string(), 10);
        let result = utilization_ratio_mode(
            &samples,
            &requests,
            0.5,
            2,
            &HashSet::new(),
            &HashSet::new(),
            2,
            0.5,
            now(),
        )
        .unwrap();
        assert_eq!(result, 8);
    }

    #[test]
    fn within_tolerance_returns_current() {
        let mut samples = PodSampleMap::new();
        samples.insert("a".into(), sample(5));
        samples.insert("b".into(), sample(5));
        let mut requests = HashMap::new();
        requests.insert("a".to_string(), 10);
        requests.insert("b".to_string(), 10);
        let result = utilization_ratio_mode(
            &samples,
            &requests,
            0.5,
            2,
            &HashSet::new(),
            &HashSet::new(),
            2,
            0.0,
            now(),
        )
        .unwrap();
        assert_eq!(result, 2);
    }

    #[test]
    fn scale_down_no_missing() {
        let mut samples = PodSampleMap::new();
        samples.insert("a".into(), sample(2));
        samples.insert("b".into(), sample(2));
        let mut requests = HashMap::new();
        requests.insert("a".to_string(), 10);
        requests.insert("b".to_string(), 10);
        let result = utilization_ratio_mode(
            &samples,
            &requests,
            0.5,
            2,
            &HashSet::new(),
            &HashSet::new(),
            2,
            0.0,
            now(),
        )
        .unwrap();
        assert_eq!(result, 1);
    }

    #[test]
    fn scale_up_with_missing_optimistic_fill() {
        let mut samples = PodSampleMap::new();
        samples.insert("pod1".into(), sample(20));
        samples.insert("pod2".into(), sample(20));
        let mut requests = HashMap::new();
        requests.insert("pod1".to_string(), 10);
        requests.insert("pod2".to_string(), 10);
        requests.insert("missing-1".to_string(), 10);
        requests.insert("missing-2".to_string(), 10);
        let missing: HashSet<String> = ["missing-1".to_string(), "missing-2".to_string()]
            .into_iter()
            .collect();
        let result = utilization_ratio_mode(
            &samples, &requests, 0.5, 2, &missing, &HashSet::new(), 4, 0.0, now(),
        )
        .unwrap();
        assert_eq!(result, 8);
    }

    #[test]
    fn scale_down_with_missing_pessimistic_fill() {
        let mut samples = PodSampleMap::new();
        samples.insert("pod1".into(), sample(1));
        samples.insert("pod2".into(), sample(1));
        let mut requests = HashMap::new();
        requests.insert("pod1".to_string(), 20);
        requests.insert("pod2".to_string(), 20);
        requests.insert("missing-1".to_string(), 3);
        requests.insert("missing-2".to_string(), 3);
        let missing: HashSet<String> = ["missing-1".to_string(), "missing-2".to_string()]
            .into_iter()
            .collect();
        let result = utilization_ratio_mode(
            &samples, &requests, 0.5, 2, &missing, &HashSet::new(), 4, 0.0, now(),
        )
        .unwrap();
        assert_eq!(result, 2);
    }

    #[test]
    fn direction_flip_guard_holds_current() {
        // Base ratio < 1 (scale down), but the pessimistic fill for a very
        // expensive missing pod pushes the corrected ratio above 1: the
        // guard must hold the current replica count rather than scale up.
        let mut samples = PodSampleMap::new();
        samples.insert("a".into(), sample(1));
        let mut requests = HashMap::new();
        requests.insert("a".to_string(), 100);
        requests.insert("missing".to_string(), 1000);
        let missing: HashSet<String> = ["missing".to_string()].into_iter().collect();
        let result = utilization_ratio_mode(
            &samples, &requests, 1.0, 1, &missing, &HashSet::new(), 3, 0.0, now(),
        )
        .unwrap();
        assert_eq!(result, 3);
    }

    #[test]
    fn usage_ratio_replicas_scale_from_zero() {
        assert_eq!(usage_ratio_replicas(0, 0.0, 0, 0.1), 0);
        assert_eq!(usage_ratio_replicas(0, 0.5, 0, 0.1), 1);
        assert_eq!(usage_ratio_replicas(0, 1.0, 0, 0.1), 1);
        assert_eq!(usage_ratio_replicas(0, 2.0, 0, 0.1), 2);
    }

    #[test]
    fn usage_ratio_replicas_within_tolerance() {
        assert_eq!(usage_ratio_replicas(4, 1.05, 4, 0.1), 4);
    }

    #[test]
    fn per_pod_average_outside_tolerance_scales() {
        assert_eq!(per_pod_average_replicas(400, 50, 4, 0.0), 8);
    }

    #[test]
    fn per_pod_average_within_tolerance_holds() {
        assert_eq!(per_pod_average_replicas(200, 50, 4, 0.1), 4);
    }
}
