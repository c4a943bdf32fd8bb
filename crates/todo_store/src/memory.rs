//! In-memory todo store implementation for testing.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::{FrameSubscription, NewTodo, Todo, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{TodoStore, TodoStoreError, TodoStoreResult};

/// In-memory todo store for testing purposes.
#[derive(Debug, Default, Clone)]
pub struct MemoryTodoStore {
    users: Arc<RwLock<HashMap<u64, User>>>,
    todos: Arc<RwLock<HashMap<Uuid, Todo>>>,
}

impl MemoryTodoStore {
    /// Creates a new in-memory todo store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored users.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Returns the number of stored todos.
    pub async fn todo_count(&self) -> usize {
        self.todos.read().await.len()
    }

    /// Inserts or replaces a user as-is.
    pub async fn put_user(&self, user: User) {
        self.users.write().await.insert(user.fid, user);
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn ensure_user(&self, fid: u64) -> TodoStoreResult<User> {
        let mut users = self.users.write().await;
        Ok(users.entry(fid).or_insert_with(|| User::new(fid)).clone())
    }

    async fn get_user(&self, fid: u64) -> TodoStoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&fid).cloned())
    }

    async fn set_wallet_address(&self, fid: u64, address: &str) -> TodoStoreResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&fid)
            .ok_or_else(|| TodoStoreError::not_found("User", fid.to_string()))?;
        user.wallet_address = Some(address.to_string());
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_subscription(
        &self,
        fid: u64,
        subscription: &FrameSubscription,
    ) -> TodoStoreResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&fid)
            .ok_or_else(|| TodoStoreError::not_found("User", fid.to_string()))?;
        user.subscription = subscription.clone();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn create_todo(&self, todo: NewTodo) -> TodoStoreResult<Todo> {
        let todo = Todo::from_new(todo);
        let mut todos = self.todos.write().await;
        todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn get_todo(&self, id: Uuid) -> TodoStoreResult<Option<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos.get(&id).cloned())
    }

    async fn list_open_todos(&self, fid: u64, limit: u32) -> TodoStoreResult<Vec<Todo>> {
        let todos = self.todos.read().await;
        let mut open: Vec<Todo> = todos
            .values()
            .filter(|t| t.is_owned_by(fid) && !t.completed)
            .cloned()
            .collect();
        open.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        open.truncate(limit as usize);
        Ok(open)
    }

    async fn complete_todo(
        &self,
        id: Uuid,
        fid: u64,
        completed_at: DateTime<Utc>,
    ) -> TodoStoreResult<bool> {
        let mut todos = self.todos.write().await;
        match todos.get_mut(&id) {
            Some(todo) if todo.is_owned_by(fid) => {
                todo.completed = true;
                todo.completed_at = Some(completed_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
