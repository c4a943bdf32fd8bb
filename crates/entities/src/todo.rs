//! Todo entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priority assigned to todos created from a frame interaction.
pub const DEFAULT_TODO_PRIORITY: i32 = 4;

/// A todo owned by a feed user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier.
    pub id: Uuid,
    /// Feed identity of the owner.
    pub user_fid: u64,
    /// Todo text, already trimmed.
    pub text: String,
    /// Priority. Carries no behavior of its own.
    pub priority: i32,
    /// Whether the todo has been completed.
    pub completed: bool,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When the todo was completed.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Todo {
    /// Creates an open todo from a validated [`NewTodo`].
    pub fn from_new(new: NewTodo) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_fid: new.user_fid,
            text: new.text,
            priority: new.priority,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Returns true if `fid` owns this todo.
    pub fn is_owned_by(&self, fid: u64) -> bool {
        self.user_fid == fid
    }
}

/// Input for creating a todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    /// Feed identity of the owner.
    pub user_fid: u64,
    /// Trimmed, non-empty text.
    pub text: String,
    /// Priority.
    pub priority: i32,
}

impl NewTodo {
    /// Builds a todo from raw user input.
    ///
    /// Returns `None` when the input is blank after trimming.
    pub fn from_input(user_fid: u64, input: &str) -> Option<Self> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            user_fid,
            text: text.to_string(),
            priority: DEFAULT_TODO_PRIORITY,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_todo_trims_input() {
        let new = NewTodo::from_input(7, "  buy milk \n").unwrap();
        assert_eq!(new.text, "buy milk");
        assert_eq!(new.priority, DEFAULT_TODO_PRIORITY);
        assert_eq!(new.user_fid, 7);
    }

    #[test]
    fn test_new_todo_rejects_blank_input() {
        assert!(NewTodo::from_input(7, "").is_none());
        assert!(NewTodo::from_input(7, "   \t ").is_none());
    }

    #[test]
    fn test_todo_from_new_is_open() {
        let todo = Todo::from_new(NewTodo::from_input(42, "walk dog").unwrap());
        assert!(!todo.completed);
        assert!(todo.completed_at.is_none());
        assert_eq!(todo.priority, 4);
        assert!(todo.is_owned_by(42));
        assert!(!todo.is_owned_by(43));
    }
}
