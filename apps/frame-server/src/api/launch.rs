//! Launch page.

use std::sync::Arc;

use axum::{extract::State, response::Html};
use frame_protocol::render_launch_page;
use todo_store::TodoStore;

use crate::state::AppState;

/// Serves the page whose meta tags describe the launch card.
pub async fn launch_page<S: TodoStore>(State(state): State<Arc<AppState<S>>>) -> Html<String> {
    Html(render_launch_page(&state.links))
}
