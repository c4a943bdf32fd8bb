//! Todo API endpoints.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use frame_protocol::{
    requests::{CompleteTodoRequest, ListTodosRequest},
    responses::{CompleteTodoResponse, ListTodosResponse, TodoView},
    LIST_CARD_LIMIT,
};
use todo_store::TodoStore;

use crate::api::extract::{ApiJson, ApiJsonOrDefault};
use crate::error::{ServerError, ServerResult};
use crate::middleware::auth::SessionUser;
use crate::services::completion::complete_for_user;
use crate::state::AppState;

/// Largest page the companion list may request.
const MAX_LIST_LIMIT: u32 = 50;

/// Lists the signed-in user's open todos, newest first.
///
/// The body may be omitted.
pub async fn list_todos<S: TodoStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(session): Extension<SessionUser>,
    ApiJsonOrDefault(request): ApiJsonOrDefault<ListTodosRequest>,
) -> ServerResult<Json<ListTodosResponse>> {
    let limit = request.limit.unwrap_or(LIST_CARD_LIMIT);
    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
        return Err(ServerError::InvalidRequest(format!(
            "limit must be between 1 and {}",
            MAX_LIST_LIMIT
        )));
    }

    let todos = state.store.list_open_todos(session.fid, limit).await?;

    Ok(Json(ListTodosResponse {
        todos: todos.iter().map(TodoView::from).collect(),
    }))
}

/// Completes one of the signed-in user's todos.
pub async fn complete_todo<S: TodoStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(session): Extension<SessionUser>,
    ApiJson(request): ApiJson<CompleteTodoRequest>,
) -> ServerResult<Json<CompleteTodoResponse>> {
    let user = state.store.ensure_user(session.fid).await?;
    let outcome = complete_for_user(&state, &user, request.todo_id, true).await?;

    Ok(Json(CompleteTodoResponse {
        completed: outcome.completed,
        streak: outcome.streak,
    }))
}
