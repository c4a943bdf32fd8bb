//! API endpoints.

pub mod auth;
pub mod events;
pub mod extract;
pub mod frame;
pub mod launch;
pub mod todos;
pub mod wallet;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use todo_store::TodoStore;

use crate::middleware::auth::require_session;
use crate::state::AppState;

/// Creates the API router with all endpoints.
///
/// `state` is needed up front to wire the session middleware.
pub fn create_router<S: TodoStore + 'static>(
    state: Arc<AppState<S>>,
) -> Router<Arc<AppState<S>>> {
    let companion = Router::new()
        .route("/api/auth/me", get(auth::current_user))
        .route("/api/wallet", post(wallet::link_wallet))
        .route("/api/todos/list", post(todos::list_todos))
        .route("/api/todos/complete", post(todos::complete_todo))
        .route("/api/frame/events", post(events::frame_event))
        .route_layer(from_fn_with_state(state, require_session::<S>));

    Router::new()
        // Frame endpoints
        .route("/", get(launch::launch_page))
        .route("/api/frame", post(frame::handle_frame))
        // Sign-in endpoints
        .route("/api/auth/nonce", post(auth::issue_nonce))
        .route("/api/auth/sign-in", post(auth::sign_in))
        // Companion endpoints (session required)
        .merge(companion)
        // Health check
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
