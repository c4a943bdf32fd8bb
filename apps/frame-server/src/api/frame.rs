//! Frame interaction endpoint.
//!
//! Each request is one button press on a card. The server keeps no session
//! for the frame surface: the card being pressed is recovered from the state
//! echoed back by the client, and the pressed index is resolved against that
//! card's buttons.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use entities::NewTodo;
use frame_protocol::{Card, FrameRequest, FrameResponse, Interaction, LIST_CARD_LIMIT};
use todo_store::TodoStore;
use tracing::{debug, info, warn};

use crate::error::{ServerError, ServerResult};
use crate::services::completion::complete_for_user;
use crate::state::AppState;

/// Handles a signed frame interaction and returns the next card.
pub async fn handle_frame<S: TodoStore>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> ServerResult<Json<FrameResponse>> {
    // A body that is not a frame request cannot carry a valid signature.
    let request: FrameRequest =
        serde_json::from_slice(&body).map_err(|_| ServerError::InvalidSignature)?;

    let message = state.verifier.verify_frame_action(&request).await?;
    let fid = message.fid;
    let interaction = message.interaction()?;

    debug!(fid, interaction = ?interaction, "Frame interaction");

    let card = if interaction.is_entry() {
        Card::entry(&state.links, fid)
    } else {
        next_card(&state, fid, interaction).await?
    };

    Ok(Json(card.into()))
}

async fn next_card<S: TodoStore>(
    state: &AppState<S>,
    fid: u64,
    interaction: Interaction,
) -> ServerResult<Card> {
    let user = state.store.ensure_user(fid).await?;

    match interaction {
        Interaction::Entry | Interaction::Compose => Ok(Card::entry(&state.links, fid)),

        Interaction::Unrecognized { button_index } => {
            debug!(fid, button_index, "Button not on the echoed card");
            Ok(Card::entry(&state.links, fid))
        }

        Interaction::SubmitTodo { input } => {
            let Some(new_todo) = NewTodo::from_input(fid, &input) else {
                return Ok(Card::empty_input(&state.links, fid));
            };
            let todo = state.store.create_todo(new_todo).await?;
            info!(fid, todo_id = %todo.id, "Created todo");
            Ok(Card::added(&state.links, fid))
        }

        Interaction::ShowList => {
            let todos = state.store.list_open_todos(fid, LIST_CARD_LIMIT).await?;
            Ok(Card::list(&state.links, fid, &todos))
        }

        Interaction::CompleteSelected { todo_id: None } => {
            warn!(fid, "Complete pressed without a selected todo");
            Ok(Card::completed(&state.links, fid, user.streak_count))
        }

        Interaction::CompleteSelected {
            todo_id: Some(todo_id),
        } => {
            let outcome = complete_for_user(state, &user, todo_id, false).await?;
            Ok(Card::completed(&state.links, fid, outcome.streak))
        }
    }
}
