//! Session authentication middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use todo_store::TodoStore;

use crate::error::ServerError;
use crate::state::AppState;

/// The signed-in user of a companion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub fid: u64,
}

/// Extracts the bearer token from the Authorization header.
fn extract_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Requires a valid session token.
///
/// On success the [`SessionUser`] is stored in the request extensions.
pub async fn require_session<S: TodoStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_token(&request) else {
        return ServerError::AuthenticationRequired.into_response();
    };

    let fid = match state
        .jwt_manager
        .validate_token(token)
        .and_then(|claims| claims.fid())
    {
        Ok(fid) => fid,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected session token");
            return ServerError::Auth(e).into_response();
        }
    };

    request.extensions_mut().insert(SessionUser { fid });
    next.run(request).await
}
