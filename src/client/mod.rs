pub mod types;

use crate::error::PollerError;
use async_trait::async_trait;
use std::time::Duration;
use types::StatusSnapshot;

/// Anything that can produce the current status of a job
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self) -> Result<StatusSnapshot, PollerError>;

    /// Human readable identity, used for logs and sinks
    fn describe(&self) -> String;
}

/// HTTP client for a job status endpoint
pub struct StatusClient {
    status_url: String,
    http_client: reqwest::Client,
}

impl StatusClient {
    pub fn new(status_url: String, timeout: Duration) -> Result<Self, PollerError> {
        if !status_url.starts_with("http://") && !status_url.starts_with("https://") {
            return Err(PollerError::InvalidUrl(status_url));
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            status_url,
            http_client,
        })
    }

    pub fn status_url(&self) -> &str {
        &self.status_url
    }
}

#[async_trait]
impl StatusSource for StatusClient {
    /// GET the status URL and decode the JSON body
    async fn fetch(&self) -> Result<StatusSnapshot, PollerError> {
        let response = self.http_client
            .get(&self.status_url)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollerError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        let snapshot: StatusSnapshot = serde_json::from_slice(&body)?;

        Ok(snapshot)
    }

    fn describe(&self) -> String {
        self.status_url.clone()
    }
}
