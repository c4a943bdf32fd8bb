//! Points award client.

use std::time::Duration;

use async_trait::async_trait;
use frame_protocol::requests::PointsAwardRequest;

use super::outbound::{JsonEndpoint, OutboundError};

/// Awards points for a completed todo.
#[async_trait]
pub trait PointsAwarder: Send + Sync {
    /// Awards points to the wallet in `request`.
    async fn award(&self, request: &PointsAwardRequest) -> Result<(), OutboundError>;
}

/// Points awarder backed by an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpPointsAwarder {
    endpoint: JsonEndpoint,
}

impl HttpPointsAwarder {
    /// Creates an awarder posting to `url`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            endpoint: JsonEndpoint::new(url, timeout)?,
        })
    }
}

#[async_trait]
impl PointsAwarder for HttpPointsAwarder {
    async fn award(&self, request: &PointsAwardRequest) -> Result<(), OutboundError> {
        self.endpoint.post(request).await
    }
}
