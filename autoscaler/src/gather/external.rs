use anyhow::{anyhow, Result};
use resources::objects::metric_spec::ExternalMetricSpec;
use resources::objects::Selector;

use super::count_ready;
use crate::measurement::ExternalMeasurement;
use crate::metrics_client::MetricsClient;
use crate::pod_lister::PodLister;
use crate::scale_target::ScaleTarget;

pub fn gather(
    spec: &ExternalMetricSpec,
    target: &ScaleTarget,
    client: &dyn MetricsClient,
    lister: &dyn PodLister,
) -> Result<ExternalMeasurement> {
    let wants_average_value = spec.target.average_value.is_some();
    let wants_average_utilization = spec.target.average_utilization.is_some();
    if !wants_average_value && !wants_average_utilization {
        return Err(anyhow!(
            "invalid external metric source: target must set averageValue or averageUtilization"
        ));
    }

    let metric_selector = Selector::parse_optional(spec.selector.as_deref())?;
    let (values, timestamp) = client.external_metric(&spec.metric_name, &target.namespace, &metric_selector)?;
    let utilization: i64 = values.iter().sum();

    let ready_pod_count = if wants_average_utilization {
        let pod_selector = Selector::parse_optional(spec.pod_selector.as_deref())?;
        let pods = lister.list(&target.namespace, &pod_selector)?;
        Some(count_ready(&pods))
    } else {
        None
    };

    tracing::debug!(
        "external metric {} gathered: utilization={utilization} (summed {} sample(s)), ready_pod_count={ready_pod_count:?}",
        spec.metric_name,
        values.len()
    );
    Ok(ExternalMeasurement { utilization, ready_pod_count, timestamp })
}
