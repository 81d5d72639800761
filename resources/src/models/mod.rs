use serde::{Deserialize, Serialize};

/// Envelope every metrics-API response is wrapped in, mirroring the
/// `{msg, data}` shape the collaborator's HTTP API returns.
#[derive(Debug, Serialize, Deserialize)]
pub struct Response<T> {
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T> Response<T> {
    pub fn new(msg: Option<String>, data: Option<T>) -> Self {
        Self { msg, data }
    }

    /// Unwraps `data`, turning a present-but-empty response into an error.
    pub fn into_data(self, what: &str) -> anyhow::Result<T> {
        self.data
            .ok_or_else(|| anyhow::anyhow!("{what}: empty response"))
    }
}
