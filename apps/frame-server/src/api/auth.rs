//! Sign-in API endpoints.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use frame_protocol::{
    requests::SignInRequest,
    responses::{NonceResponse, SessionResponse, SignInResponse},
};
use todo_store::TodoStore;
use tracing::info;

use crate::api::extract::ApiJson;
use crate::error::{ServerError, ServerResult};
use crate::middleware::auth::SessionUser;
use crate::services::verifier::VerifyError;
use crate::state::AppState;

/// Issues a single-use sign-in nonce.
pub async fn issue_nonce<S: TodoStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<NonceResponse>> {
    let nonce = state.nonces.issue().await?;
    Ok(Json(NonceResponse { nonce }))
}

/// Exchanges a signed sign-in message for a session token.
pub async fn sign_in<S: TodoStore>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(request): ApiJson<SignInRequest>,
) -> ServerResult<Json<SignInResponse>> {
    // Consume the nonce first so a rejected message still burns it.
    state.nonces.take(&request.nonce).await?;

    let fid = state
        .verifier
        .verify_sign_in(&request)
        .await
        .map_err(|e| match e {
            VerifyError::InvalidSignature => ServerError::AuthenticationRequired,
            other => other.into(),
        })?;

    state.store.ensure_user(fid).await?;
    let token = state.jwt_manager.generate_token(fid)?;

    info!(fid, "Signed in");

    Ok(Json(SignInResponse {
        token,
        expires_in: state.jwt_manager.expiration_seconds(),
        fid,
    }))
}

/// Returns the signed-in user.
pub async fn current_user<S: TodoStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(session): Extension<SessionUser>,
) -> ServerResult<Json<SessionResponse>> {
    let user = state
        .store
        .get_user(session.fid)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    Ok(Json(SessionResponse::from(&user)))
}
