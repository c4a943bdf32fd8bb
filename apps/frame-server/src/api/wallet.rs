//! Wallet linking endpoint.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use entities::is_wallet_address;
use frame_protocol::{requests::LinkWalletRequest, responses::LinkWalletResponse};
use todo_store::TodoStore;
use tracing::info;

use crate::api::extract::ApiJson;
use crate::error::{ServerError, ServerResult};
use crate::middleware::auth::SessionUser;
use crate::state::AppState;

/// Links a wallet address to the signed-in user.
pub async fn link_wallet<S: TodoStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(session): Extension<SessionUser>,
    ApiJson(request): ApiJson<LinkWalletRequest>,
) -> ServerResult<Json<LinkWalletResponse>> {
    let address = request.address.trim();
    if !is_wallet_address(address) {
        return Err(ServerError::InvalidRequest(
            "Invalid wallet address".to_string(),
        ));
    }

    state.store.ensure_user(session.fid).await?;
    let user = state.store.set_wallet_address(session.fid, address).await?;

    info!(fid = session.fid, "Linked wallet");

    Ok(Json(LinkWalletResponse {
        wallet_address: user.wallet_address.unwrap_or_else(|| address.to_string()),
    }))
}
