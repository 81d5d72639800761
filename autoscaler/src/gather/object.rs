use anyhow::{anyhow, Result};
use resources::objects::metric_spec::ObjectMetricSpec;
use resources::objects::Selector;

use super::count_ready;
use crate::measurement::ObjectMeasurement;
use crate::metrics_client::MetricsClient;
use crate::pod_lister::PodLister;
use crate::scale_target::ScaleTarget;

pub fn gather(
    spec: &ObjectMetricSpec,
    target: &ScaleTarget,
    client: &dyn MetricsClient,
    lister: &dyn PodLister,
) -> Result<ObjectMeasurement> {
    let wants_value = spec.target.value.is_some();
    let wants_average = spec.target.average_value.is_some();
    if !wants_value && !wants_average {
        return Err(anyhow!(
            "invalid object metric source: neither a value target nor an average value target was set"
        ));
    }

    let metric_selector = Selector::parse_optional(spec.selector.as_deref())?;
    let (utilization, timestamp) =
        client.object_metric(&spec.metric_name, &target.namespace, &spec.described_object, &metric_selector)?;

    let ready_pod_count = if wants_value {
        let pods = lister.list(&target.namespace, &target.selector)?;
        Some(count_ready(&pods))
    } else {
        None
    };

    tracing::debug!("object metric {} gathered: utilization={utilization}, ready_pod_count={ready_pod_count:?}", spec.metric_name);
    Ok(ObjectMeasurement { utilization, ready_pod_count, timestamp })
}
