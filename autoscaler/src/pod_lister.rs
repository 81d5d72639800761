//! The `PodLister` collaborator (§6): lists pods matching a label selector
//! within a namespace.

use anyhow::Result;
use reqwest::blocking::Client;
use resources::models::Response;
use resources::objects::pod::PodRecord;
use resources::objects::Selector;

pub trait PodLister {
    fn list(&self, namespace: &str, selector: &Selector) -> Result<Vec<PodRecord>>;
}

pub struct HttpPodLister {
    client: Client,
    base_url: String,
}

impl HttpPodLister {
    pub fn new(base_url: String) -> Self {
        Self { client: Client::new(), base_url }
    }
}

impl PodLister for HttpPodLister {
    fn list(&self, namespace: &str, selector: &Selector) -> Result<Vec<PodRecord>> {
        let response = self
            .client
            .get(format!("{}/api/v1/namespaces/{}/pods", self.base_url, namespace))
            .query(&[("selector", selector.to_string())])
            .send()?
            .json::<Response<Vec<PodRecord>>>()?;
        response.into_data("pod list")
    }
}
