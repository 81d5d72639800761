//! Partitions a pod set into ready / ignored / missing (§4.1). Pure function:
//! the caller supplies `now` rather than this module consulting a clock, so
//! tests can exercise every timing-gate branch deterministically.

use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime};
use resources::objects::metrics::{PodSample, PodSampleMap, Resource};
use resources::objects::pod::{ConditionStatus, PodRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodClassification {
    pub ready: u32,
    pub ignored: HashSet<String>,
    pub missing: HashSet<String>,
}

/// `measured_resource`: `Some(Resource::CPU)` triggers the timing gates;
/// anything else (including `Some(Resource::Memory)`) is gated like a
/// non-resource source.
pub fn classify(
    pods: &[PodRecord],
    samples: &PodSampleMap,
    measured_resource: Option<Resource>,
    now: NaiveDateTime,
    cpu_initialization_period: Duration,
    initial_readiness_delay: Duration,
) -> PodClassification {
    let mut ready = 0u32;
    let mut ignored = HashSet::new();
    let mut missing = HashSet::new();

    for pod in pods {
        if pod.is_terminating_or_failed() {
            tracing::debug!("skipping terminating or failed pod {}", pod.name);
            continue;
        }
        let sample = match samples.get(&pod.name) {
            Some(sample) => sample,
            None => {
                tracing::debug!("no sample found for pod {}, classifying as missing", pod.name);
                missing.insert(pod.name.clone());
                continue;
            }
        };
        if measured_resource == Some(Resource::CPU)
            && is_ignored_cpu_pod(pod, sample, now, cpu_initialization_period, initial_readiness_delay)
        {
            tracing::debug!("ignoring pod {} still within CPU initialization window", pod.name);
            ignored.insert(pod.name.clone());
            continue;
        }
        ready += 1;
    }

    PodClassification { ready, ignored, missing }
}

fn is_ignored_cpu_pod(
    pod: &PodRecord,
    sample: &PodSample,
    now: NaiveDateTime,
    cpu_initialization_period: Duration,
    initial_readiness_delay: Duration,
) -> bool {
    let (ready_condition, start_time) = match (&pod.ready, pod.start_time) {
        (Some(ready_condition), Some(start_time)) => (ready_condition, start_time),
        _ => return true,
    };

    let window = Duration::seconds(sample.window_seconds);
    if start_time + cpu_initialization_period > now {
        ready_condition.status == ConditionStatus::False
            || sample.timestamp < ready_condition.last_transition_time + window
    } else {
        ready_condition.status == ConditionStatus::False
            && start_time + initial_readiness_delay > ready_condition.last_transition_time
    }
}
