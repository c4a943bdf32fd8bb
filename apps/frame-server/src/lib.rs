//! Todo-Cast frame server
//!
//! Serves the todo card state machine to social-feed clients, the launch
//! page that embeds the first card, and the companion API used by the
//! in-client view.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

use std::sync::Arc;

use auth::{JwtConfig, JwtManager, MemoryNonceStore};
use axum::Router;
use frame_protocol::FrameLinks;
use todo_store::TodoStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::services::{
    notifier::{HttpNotifier, Notifier},
    points::{HttpPointsAwarder, PointsAwarder},
    verifier::{HubVerifier, MessageVerifier},
};
use crate::state::{AppState, SharedState};

/// Outbound collaborators of the server.
pub struct Services {
    pub verifier: Arc<dyn MessageVerifier>,
    pub points: Option<Arc<dyn PointsAwarder>>,
    pub notifier: Option<Arc<dyn Notifier>>,
}

impl Services {
    /// Builds the HTTP-backed collaborators described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let timeout = config.http_timeout();

        let verifier = HubVerifier::new(&config.hub_url, config.hub_api_key.clone(), timeout)?;

        let points = match &config.points_url {
            Some(url) => {
                let awarder: Arc<dyn PointsAwarder> =
                    Arc::new(HttpPointsAwarder::new(url, timeout)?);
                Some(awarder)
            }
            None => {
                tracing::info!("TODOCAST_POINTS_URL not set, points awards disabled");
                None
            }
        };

        let notifier = match &config.notify_url {
            Some(url) => {
                let notifier: Arc<dyn Notifier> = Arc::new(HttpNotifier::new(url, timeout)?);
                Some(notifier)
            }
            None => {
                tracing::info!("TODOCAST_NOTIFY_URL not set, notifications disabled");
                None
            }
        };

        Ok(Self {
            verifier: Arc::new(verifier),
            points,
            notifier,
        })
    }
}

/// Creates the application router with all routes configured.
pub fn create_app<S: TodoStore + 'static>(state: SharedState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::create_router(state.clone())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Creates the application state with the given configuration, store and collaborators.
pub fn create_state<S: TodoStore>(
    config: Config,
    store: S,
    services: Services,
) -> anyhow::Result<SharedState<S>> {
    let links = FrameLinks::new(&config.public_url)?;

    let secret = match &config.jwt_secret {
        Some(secret) => secret.clone(),
        None => {
            tracing::warn!(
                "TODOCAST_JWT_SECRET not set, using a random secret; sessions end on restart"
            );
            format!("{}{}", auth::generate_nonce(), auth::generate_nonce())
        }
    };
    let jwt_manager = JwtManager::new(
        JwtConfig::new(secret).with_expiration_hours(config.jwt_expiration_hours),
    );

    Ok(Arc::new(AppState {
        config,
        store,
        links,
        verifier: services.verifier,
        points: services.points,
        notifier: services.notifier,
        jwt_manager,
        nonces: Arc::new(MemoryNonceStore::default()),
    }))
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
