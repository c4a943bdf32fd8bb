use chrono::{DateTime, SecondsFormat, Utc};
use entities::{FrameSubscription, NotificationDetails, Todo, User};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{TodoStoreError, TodoStoreResult};

/// Schema for SQLite databases.
pub(crate) const SQLITE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    fid INTEGER PRIMARY KEY,
    wallet_address TEXT,
    streak_count INTEGER NOT NULL DEFAULT 0,
    frame_added BOOLEAN NOT NULL DEFAULT 0,
    notification_url TEXT,
    notification_token TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS todos (
    id TEXT PRIMARY KEY,
    user_fid INTEGER NOT NULL REFERENCES users(fid),
    text TEXT NOT NULL,
    priority INTEGER NOT NULL DEFAULT 4,
    completed BOOLEAN NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    completed_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_todos_open ON todos (user_fid, completed, created_at);
"#;

/// Schema for PostgreSQL databases.
pub(crate) const POSTGRES_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    fid BIGINT PRIMARY KEY,
    wallet_address TEXT,
    streak_count BIGINT NOT NULL DEFAULT 0,
    frame_added BOOLEAN NOT NULL DEFAULT FALSE,
    notification_url TEXT,
    notification_token TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS todos (
    id TEXT PRIMARY KEY,
    user_fid BIGINT NOT NULL REFERENCES users(fid),
    text TEXT NOT NULL,
    priority INTEGER NOT NULL DEFAULT 4,
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TEXT NOT NULL,
    completed_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_todos_open ON todos (user_fid, completed, created_at);
"#;

pub(crate) const USER_COLUMNS: &str = "fid, wallet_address, streak_count, frame_added, \
     notification_url, notification_token, created_at, updated_at";

pub(crate) const TODO_COLUMNS: &str =
    "id, user_fid, text, priority, completed, created_at, completed_at";

/// Formats a timestamp so that lexical order matches chronological order.
pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> TodoStoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| TodoStoreError::invalid_data(format!("timestamp {:?}: {}", value, e)))
}

/// Converts a feed identity to its column value.
pub(crate) fn fid_column(fid: u64) -> TodoStoreResult<i64> {
    i64::try_from(fid).map_err(|_| TodoStoreError::invalid_data(format!("fid {} out of range", fid)))
}

fn fid_from_column(value: i64) -> TodoStoreResult<u64> {
    u64::try_from(value).map_err(|_| TodoStoreError::invalid_data(format!("fid {}", value)))
}

/// Database row for User
#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub fid: i64,
    pub wallet_address: Option<String>,
    pub streak_count: i64,
    pub frame_added: bool,
    pub notification_url: Option<String>,
    pub notification_token: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = TodoStoreError;

    fn try_from(row: UserRow) -> TodoStoreResult<Self> {
        let notification = match (row.notification_url, row.notification_token) {
            (Some(url), Some(token)) => Some(NotificationDetails { url, token }),
            _ => None,
        };

        Ok(User {
            fid: fid_from_column(row.fid)?,
            wallet_address: row.wallet_address,
            streak_count: row.streak_count,
            subscription: FrameSubscription {
                added: row.frame_added,
                notification,
            },
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

/// Database row for Todo
#[derive(Debug, FromRow)]
pub(crate) struct TodoRow {
    pub id: String,
    pub user_fid: i64,
    pub text: String,
    pub priority: i32,
    pub completed: bool,
    pub created_at: String,
    pub completed_at: Option<String>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = TodoStoreError;

    fn try_from(row: TodoRow) -> TodoStoreResult<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| TodoStoreError::invalid_data(format!("todo id {:?}: {}", row.id, e)))?;

        Ok(Todo {
            id,
            user_fid: fid_from_column(row.user_fid)?,
            text: row.text,
            priority: row.priority,
            completed: row.completed,
            created_at: parse_timestamp(&row.created_at)?,
            completed_at: row.completed_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}
