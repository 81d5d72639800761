//! The data gathered for one metric spec (§3, `GatheredMetric`), and the
//! evaluator's output (`Evaluation`). These are the wire types exchanged
//! between the gather and evaluate stages via the embedded-JSON protocol.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use resources::objects::metric_spec::MetricSpec;
use resources::objects::metrics::PodSampleMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMeasurement {
    pub samples: PodSampleMap,
    /// Per-pod milli-value requests. Absent for the AverageValue variant of
    /// the Resource gatherer, which never needs requests.
    #[serde(default)]
    pub requests: Option<HashMap<String, i64>>,
    pub ready: u32,
    pub ignored: Vec<String>,
    pub missing: Vec<String>,
    pub total_pods: u32,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodsMeasurement {
    pub samples: PodSampleMap,
    pub ready: u32,
    pub ignored: Vec<String>,
    pub missing: Vec<String>,
    pub total_pods: u32,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeasurement {
    pub utilization: i64,
    pub ready_pod_count: Option<u32>,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalMeasurement {
    pub utilization: i64,
    pub ready_pod_count: Option<u32>,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Measurement {
    Resource(ResourceMeasurement),
    Pods(PodsMeasurement),
    Object(ObjectMeasurement),
    External(ExternalMeasurement),
}

/// Ratio-engine input for one spec: the spec itself (so the evaluator knows
/// which target shape to apply), the replica count observed at gather time,
/// and the measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GatheredMetric {
    pub spec: MetricSpec,
    pub current_replicas: u32,
    pub measurement: Measurement,
}

/// Evaluator output: a single target replica count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Evaluation {
    pub target_replicas: i32,
}
