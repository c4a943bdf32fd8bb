//! User-related entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification channel handed out by the embedding host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDetails {
    /// Relay URL notifications are posted to.
    pub url: String,
    /// Token identifying this user's subscription.
    pub token: String,
}

/// Whether the frame is added on the user's client, and how to reach them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSubscription {
    /// The user added the frame to their client.
    pub added: bool,
    /// Notification channel, present only while notifications are enabled.
    pub notification: Option<NotificationDetails>,
}

impl FrameSubscription {
    /// Subscription after the host reports the frame was added.
    pub fn added(notification: Option<NotificationDetails>) -> Self {
        Self {
            added: true,
            notification,
        }
    }

    /// Subscription after the host reports the frame was removed.
    pub fn removed() -> Self {
        Self::default()
    }

    /// Returns true if a notification channel is registered.
    pub fn notifications_enabled(&self) -> bool {
        self.notification.is_some()
    }
}

/// A feed user, keyed by feed identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Feed identity.
    pub fid: u64,
    /// Linked wallet address.
    pub wallet_address: Option<String>,
    /// Streak counter. Read on completion, never advanced.
    pub streak_count: i64,
    /// Frame subscription state.
    pub subscription: FrameSubscription,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with no wallet and a zero streak.
    pub fn new(fid: u64) -> Self {
        let now = Utc::now();
        Self {
            fid,
            wallet_address: None,
            streak_count: 0,
            subscription: FrameSubscription::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the wallet address.
    pub fn with_wallet(mut self, address: impl Into<String>) -> Self {
        self.wallet_address = Some(address.into());
        self
    }
}

/// Returns true if `address` looks like an EVM address (`0x` + 40 hex digits).
pub fn is_wallet_address(address: &str) -> bool {
    address
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
