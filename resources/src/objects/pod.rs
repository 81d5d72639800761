use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{metrics::Resource, Labels};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PodPhase {
    /// The pod has been accepted by the cluster but isn't running yet.
    Pending,
    /// At least one container is still running.
    Running,
    /// All containers terminated in success.
    Succeeded,
    /// At least one container terminated in failure.
    Failed,
}

/// Status of a pod condition. `Unknown` is treated the same as `False` by
/// the classifier: only an explicit `True` counts as ready.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

/// The pod's Ready condition, with the timestamp of its last transition.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReadyCondition {
    pub status: ConditionStatus,
    pub last_transition_time: NaiveDateTime,
}

/// Resource requests declared by one container, keyed by resource name.
/// Absence of a key means that container did not declare a request for it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct ContainerRequests(pub HashMap<Resource, i64>);

/// A snapshot of one pod's lifecycle, as seen by the pod lister. This is the
/// unit the classifier partitions into ready / ignored / missing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PodRecord {
    pub name: String,
    #[serde(default)]
    pub labels: Labels,
    pub phase: PodPhase,
    #[serde(default)]
    pub deletion_in_progress: bool,
    pub start_time: Option<NaiveDateTime>,
    pub ready: Option<ReadyCondition>,
    #[serde(default)]
    pub containers: Vec<ContainerRequests>,
}

impl PodRecord {
    pub fn is_terminating_or_failed(&self) -> bool {
        self.deletion_in_progress || self.phase == PodPhase::Failed
    }

    /// Sums the milli-value request for `resource` across every container.
    /// Returns `None` if any container (or none at all) fails to declare it,
    /// per the Resource-source invariant that requests are only defined for
    /// pods whose containers all declare the resource.
    pub fn total_request(&self, resource: Resource) -> Option<i64> {
        if self.containers.is_empty() {
            return None;
        }
        let mut total = 0i64;
        for container in &self.containers {
            total += *container.0.get(&resource)?;
        }
        Some(total)
    }
}
