//! Todo store trait definitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::{FrameSubscription, NewTodo, Todo, User};
use uuid::Uuid;

use crate::TodoStoreResult;

/// Trait for user and todo storage operations.
#[async_trait]
pub trait TodoStore: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates the user if absent and returns the stored row.
    ///
    /// Insert-if-absent is a single statement, so concurrent calls for the
    /// same fid never produce duplicates or uniqueness errors.
    async fn ensure_user(&self, fid: u64) -> TodoStoreResult<User>;

    /// Gets a user by feed identity.
    async fn get_user(&self, fid: u64) -> TodoStoreResult<Option<User>>;

    /// Links a wallet address to an existing user.
    async fn set_wallet_address(&self, fid: u64, address: &str) -> TodoStoreResult<User>;

    /// Replaces the frame subscription of an existing user.
    async fn set_subscription(
        &self,
        fid: u64,
        subscription: &FrameSubscription,
    ) -> TodoStoreResult<User>;

    // =========================================================================
    // Todo operations
    // =========================================================================

    /// Creates an open todo.
    async fn create_todo(&self, todo: NewTodo) -> TodoStoreResult<Todo>;

    /// Gets a todo by ID.
    async fn get_todo(&self, id: Uuid) -> TodoStoreResult<Option<Todo>>;

    /// Lists up to `limit` incomplete todos of `fid`, newest first.
    async fn list_open_todos(&self, fid: u64, limit: u32) -> TodoStoreResult<Vec<Todo>>;

    /// Marks the todo completed if it is owned by `fid`.
    ///
    /// Returns false when no todo matched both the id and the owner.
    /// Completing an already completed todo matches again and refreshes
    /// its completion time.
    async fn complete_todo(
        &self,
        id: Uuid,
        fid: u64,
        completed_at: DateTime<Utc>,
    ) -> TodoStoreResult<bool>;
}
