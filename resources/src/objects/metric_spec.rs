use serde::{Deserialize, Serialize};

use super::{metrics::MilliValue, metrics::Resource, object_reference::ObjectReference};

/// What to measure and what target to hit. The four variants mirror the
/// four metric sources the gatherer and evaluator facades dispatch on.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum MetricSpec {
    Resource(ResourceMetricSpec),
    Pods(PodsMetricSpec),
    Object(ObjectMetricSpec),
    External(ExternalMetricSpec),
}

impl MetricSpec {
    /// The spec kind as it appears in "unknown metric source type" errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            MetricSpec::Resource(_) => "Resource",
            MetricSpec::Pods(_) => "Pods",
            MetricSpec::Object(_) => "Object",
            MetricSpec::External(_) => "External",
        }
    }
}

/// Target value, average value, or average utilization of a metric. At most
/// one of these is meaningful for any given source; which one(s) are valid
/// is a precondition checked by the gatherer facade, not by this type.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MetricTarget {
    /// Target value of the metric as a raw scalar.
    pub value: Option<MilliValue>,
    /// Target value of the average of the metric across all relevant pods.
    pub average_value: Option<MilliValue>,
    /// Target value of the average of the resource metric across all
    /// relevant pods, as a percentage of each pod's request.
    pub average_utilization: Option<MilliValue>,
}

/// Scale on a resource metric known from container requests (CPU, memory).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetricSpec {
    pub name: Resource,
    pub target: MetricTarget,
}

/// Scale on a metric describing pods directly (not tied to a requested
/// resource), e.g. queries-per-second per pod.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodsMetricSpec {
    pub metric_name: String,
    /// Equality-style label selector, e.g. "app=web,tier=frontend".
    #[serde(default)]
    pub selector: Option<String>,
    pub target: MetricTarget,
}

/// Scale on a metric describing a different object in the cluster, e.g. an
/// ingress's requests-per-second.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetricSpec {
    pub metric_name: String,
    #[serde(default)]
    pub selector: Option<String>,
    pub described_object: ObjectReference,
    pub target: MetricTarget,
}

/// Scale on a metric from outside the cluster, e.g. a managed queue's depth.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalMetricSpec {
    pub metric_name: String,
    #[serde(default)]
    pub selector: Option<String>,
    /// Second, pod-level selector used only by AverageUtilization targets to
    /// count ready pods.
    #[serde(default)]
    pub pod_selector: Option<String>,
    pub target: MetricTarget,
}
