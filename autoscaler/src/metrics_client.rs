//! The `MetricsClient` collaborator (§6): fetches raw per-pod samples,
//! resource samples, and object/external scalars from the metrics API.
//! Blocking HTTP, matching the single-threaded, sequential-I/O model (§5).

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use reqwest::blocking::Client;
use resources::models::Response;
use resources::objects::metrics::{PodSample, PodSampleMap, Resource};
use resources::objects::object_reference::ObjectReference;
use resources::objects::Selector;
use serde::Deserialize;

pub trait MetricsClient {
    fn raw_metric(
        &self,
        metric_name: &str,
        namespace: &str,
        pod_selector: &Selector,
        metric_selector: &Selector,
    ) -> Result<(PodSampleMap, NaiveDateTime)>;

    fn resource_metric(
        &self,
        resource: Resource,
        namespace: &str,
        pod_selector: &Selector,
    ) -> Result<(PodSampleMap, NaiveDateTime)>;

    fn object_metric(
        &self,
        metric_name: &str,
        namespace: &str,
        described_object: &ObjectReference,
        metric_selector: &Selector,
    ) -> Result<(i64, NaiveDateTime)>;

    fn external_metric(
        &self,
        metric_name: &str,
        namespace: &str,
        metric_selector: &Selector,
    ) -> Result<(Vec<i64>, NaiveDateTime)>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSampleDto {
    pod_name: String,
    value: i64,
    timestamp: NaiveDateTime,
    window_seconds: i64,
}

fn samples_from_dtos(dtos: Vec<RawSampleDto>) -> PodSampleMap {
    dtos.into_iter()
        .map(|dto| {
            (
                dto.pod_name,
                PodSample { value: dto.value, timestamp: dto.timestamp, window_seconds: dto.window_seconds },
            )
        })
        .collect()
}

fn latest_timestamp(samples: &PodSampleMap, fallback: NaiveDateTime) -> NaiveDateTime {
    samples.values().map(|sample| sample.timestamp).max().unwrap_or(fallback)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScalarDto {
    value: i64,
    timestamp: NaiveDateTime,
}

pub struct HttpMetricsClient {
    client: Client,
    base_url: String,
}

impl HttpMetricsClient {
    pub fn new(base_url: String) -> Self {
        Self { client: Client::new(), base_url }
    }

    fn get<T: for<'de> Deserialize<'de>>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()?
            .json::<Response<T>>()?;
        response.into_data(path)
    }
}

impl MetricsClient for HttpMetricsClient {
    fn raw_metric(
        &self,
        metric_name: &str,
        namespace: &str,
        pod_selector: &Selector,
        metric_selector: &Selector,
    ) -> Result<(PodSampleMap, NaiveDateTime)> {
        let dtos: Vec<RawSampleDto> = self.get(
            "/api/v1/metrics/pods",
            &[
                ("namespace", namespace.to_string()),
                ("metricName", metric_name.to_string()),
                ("podSelector", pod_selector.to_string()),
                ("metricSelector", metric_selector.to_string()),
            ],
        )?;
        let samples = samples_from_dtos(dtos);
        let timestamp = latest_timestamp(&samples, chrono::Utc::now().naive_utc());
        Ok((samples, timestamp))
    }

    fn resource_metric(
        &self,
        resource: Resource,
        namespace: &str,
        pod_selector: &Selector,
    ) -> Result<(PodSampleMap, NaiveDateTime)> {
        let dtos: Vec<RawSampleDto> = self.get(
            "/api/v1/metrics/resource",
            &[
                ("namespace", namespace.to_string()),
                ("resource", resource.to_string()),
                ("podSelector", pod_selector.to_string()),
            ],
        )?;
        let samples = samples_from_dtos(dtos);
        let timestamp = latest_timestamp(&samples, chrono::Utc::now().naive_utc());
        Ok((samples, timestamp))
    }

    fn object_metric(
        &self,
        metric_name: &str,
        namespace: &str,
        described_object: &ObjectReference,
        metric_selector: &Selector,
    ) -> Result<(i64, NaiveDateTime)> {
        let dto: ScalarDto = self.get(
            "/api/v1/metrics/object",
            &[
                ("namespace", namespace.to_string()),
                ("metricName", metric_name.to_string()),
                ("describedObjectKind", described_object.kind.clone()),
                ("describedObjectName", described_object.name.clone()),
                ("metricSelector", metric_selector.to_string()),
            ],
        )?;
        Ok((dto.value, dto.timestamp))
    }

    fn external_metric(
        &self,
        metric_name: &str,
        namespace: &str,
        metric_selector: &Selector,
    ) -> Result<(Vec<i64>, NaiveDateTime)> {
        let dtos: Vec<ScalarDto> = self.get(
            "/api/v1/metrics/external",
            &[
                ("namespace", namespace.to_string()),
                ("metricName", metric_name.to_string()),
                ("metricSelector", metric_selector.to_string()),
            ],
        )?;
        if dtos.is_empty() {
            return Err(anyhow!("no external samples returned for metric \"{metric_name}\""));
        }
        let timestamp = dtos.iter().map(|dto| dto.timestamp).max().unwrap();
        Ok((dtos.into_iter().map(|dto| dto.value).collect(), timestamp))
    }
}
