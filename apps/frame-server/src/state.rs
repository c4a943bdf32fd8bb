//! Application state.

use std::sync::Arc;

use auth::{JwtManager, NonceStore};
use frame_protocol::FrameLinks;
use todo_store::TodoStore;

use crate::config::Config;
use crate::services::{notifier::Notifier, points::PointsAwarder, verifier::MessageVerifier};

/// Shared application state.
pub struct AppState<S: TodoStore> {
    /// Server configuration.
    pub config: Config,
    /// Todo store.
    pub store: S,
    /// Public URLs referenced from cards.
    pub links: FrameLinks,
    /// Signed message verifier.
    pub verifier: Arc<dyn MessageVerifier>,
    /// Points awarder, if awarding is configured.
    pub points: Option<Arc<dyn PointsAwarder>>,
    /// Notification relay, if notifications are configured.
    pub notifier: Option<Arc<dyn Notifier>>,
    /// Session token manager.
    pub jwt_manager: JwtManager,
    /// Sign-in nonces.
    pub nonces: Arc<dyn NonceStore>,
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;
