//! Core entity definitions for Todo-Cast.
//!
//! This crate defines the data types shared by the frame server, the
//! protocol crate and the store: feed users and their todos.

mod todo;
mod user;

pub use todo::*;
pub use user::*;
