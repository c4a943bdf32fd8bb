//! User and todo storage for Todo-Cast
//!
//! This crate provides a storage abstraction for feed users and their todos.
//! It ships an in-memory store for tests, SQLite for single-process
//! deployments and PostgreSQL for hosted ones.

mod error;
mod memory;
mod postgres;
mod schema;
mod sqlite;
mod traits;

pub use error::*;
pub use memory::*;
pub use postgres::*;
pub use sqlite::*;
pub use traits::*;
