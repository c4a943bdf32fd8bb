//! JSON POST client shared by the best-effort outbound calls.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Failure of a best-effort outbound call.
#[derive(Debug, Error)]
pub enum OutboundError {
    /// The request could not be sent or timed out.
    #[error("Network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status.
    #[error("Endpoint returned status {0}")]
    Status(u16),
}

/// Posts JSON bodies to one fixed endpoint.
#[derive(Debug, Clone)]
pub struct JsonEndpoint {
    url: String,
    http_client: reqwest::Client,
}

impl JsonEndpoint {
    /// Creates a client for `url` whose requests give up after `timeout`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            url: url.to_string(),
            http_client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    /// Posts `body` and fails on any non-2xx status.
    pub async fn post<B: Serialize + ?Sized>(&self, body: &B) -> Result<(), OutboundError> {
        debug!(url = %self.url, "Posting outbound call");

        let response = self
            .http_client
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| OutboundError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(OutboundError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}
