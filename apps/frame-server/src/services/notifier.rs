//! Push notification client.

use std::time::Duration;

use async_trait::async_trait;
use frame_protocol::requests::NotificationRequest;

use super::outbound::{JsonEndpoint, OutboundError};

/// Delivers notifications to users who registered a channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, request: &NotificationRequest) -> Result<(), OutboundError>;
}

/// Notifier that posts to a notification relay.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    endpoint: JsonEndpoint,
}

impl HttpNotifier {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            endpoint: JsonEndpoint::new(url, timeout)?,
        })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, request: &NotificationRequest) -> Result<(), OutboundError> {
        self.endpoint.post(request).await
    }
}
