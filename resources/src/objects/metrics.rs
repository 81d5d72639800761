use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::Display;

/// A compute resource exposed by the cluster's resource metrics API.
#[derive(Debug, Serialize, Deserialize, Hash, Clone, Copy, Eq, PartialEq, Display)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    CPU,
    Memory,
}

/// Integer encoding of a fractional quantity; 1000 milli-units = 1 unit.
/// Used for every scalar target and per-pod sample so that CPU millicores
/// and arbitrary custom-metric scalars share one representation.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct MilliValue(pub i64);

impl MilliValue {
    pub fn milli_value(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

impl From<i64> for MilliValue {
    fn from(value: i64) -> Self {
        MilliValue(value)
    }
}

/// One pod's instantaneous measurement for a single metric, as returned by
/// the metrics client.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PodSample {
    pub value: i64,
    pub timestamp: NaiveDateTime,
    /// Duration in seconds over which the sample was collected.
    pub window_seconds: i64,
}

/// A mapping from pod name to its sample. Keys are unique.
pub type PodSampleMap = std::collections::HashMap<String, PodSample>;
