//! Companion API response bodies.

use entities::{Todo, User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonceResponse {
    pub nonce: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
    pub fid: u64,
}

/// Session context loaded by the companion page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub fid: u64,
    pub wallet_address: Option<String>,
    pub streak_count: i64,
    pub frame_added: bool,
    pub notifications_enabled: bool,
}

impl From<&User> for SessionResponse {
    fn from(user: &User) -> Self {
        Self {
            fid: user.fid,
            wallet_address: user.wallet_address.clone(),
            streak_count: user.streak_count,
            frame_added: user.subscription.added,
            notifications_enabled: user.subscription.notifications_enabled(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkWalletResponse {
    pub wallet_address: String,
}

/// A todo as shown by the companion page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoView {
    pub id: Uuid,
    pub text: String,
    pub priority: i32,
    pub completed: bool,
    pub created_at: String,
}

impl From<&Todo> for TodoView {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id,
            text: todo.text.clone(),
            priority: todo.priority,
            completed: todo.completed,
            created_at: todo.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTodosResponse {
    pub todos: Vec<TodoView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteTodoResponse {
    /// Whether a todo owned by the caller matched.
    pub completed: bool,
    /// Current streak, unchanged by completion.
    pub streak: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameEventResponse {
    pub frame_added: bool,
    pub notifications_enabled: bool,
}
