//! PostgreSQL todo store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::{FrameSubscription, NewTodo, Todo, User};
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use uuid::Uuid;

use crate::schema::{
    fid_column, format_timestamp, TodoRow, UserRow, POSTGRES_SCHEMA, TODO_COLUMNS, USER_COLUMNS,
};
use crate::{TodoStore, TodoStoreError, TodoStoreResult};

/// PostgreSQL-backed todo store (hosted deployments).
#[derive(Debug, Clone)]
pub struct PostgresTodoStore {
    pool: Pool<Postgres>,
}

impl PostgresTodoStore {
    /// Connects to `database_url` and creates the schema if needed.
    pub async fn connect(database_url: &str) -> TodoStoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> TodoStoreResult<()> {
        sqlx::raw_sql(POSTGRES_SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| TodoStoreError::Migration(e.to_string()))?;
        tracing::debug!("PostgreSQL schema ready");
        Ok(())
    }

    async fn require_user(&self, fid: u64) -> TodoStoreResult<User> {
        self.get_user(fid)
            .await?
            .ok_or_else(|| TodoStoreError::not_found("User", fid.to_string()))
    }
}

#[async_trait]
impl TodoStore for PostgresTodoStore {
    async fn ensure_user(&self, fid: u64) -> TodoStoreResult<User> {
        let now = format_timestamp(&Utc::now());

        let result = sqlx::query(
            "INSERT INTO users (fid, streak_count, frame_added, created_at, updated_at)
             VALUES ($1, 0, FALSE, $2, $2)
             ON CONFLICT (fid) DO NOTHING",
        )
        .bind(fid_column(fid)?)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::debug!(fid, "Created user");
        }

        self.require_user(fid).await
    }

    async fn get_user(&self, fid: u64) -> TodoStoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE fid = $1", USER_COLUMNS))
                .bind(fid_column(fid)?)
                .fetch_optional(&self.pool)
                .await?;

        row.map(User::try_from).transpose()
    }

    async fn set_wallet_address(&self, fid: u64, address: &str) -> TodoStoreResult<User> {
        let result =
            sqlx::query("UPDATE users SET wallet_address = $1, updated_at = $2 WHERE fid = $3")
                .bind(address)
                .bind(format_timestamp(&Utc::now()))
                .bind(fid_column(fid)?)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(TodoStoreError::not_found("User", fid.to_string()));
        }
        self.require_user(fid).await
    }

    async fn set_subscription(
        &self,
        fid: u64,
        subscription: &FrameSubscription,
    ) -> TodoStoreResult<User> {
        let (url, token) = match &subscription.notification {
            Some(details) => (Some(details.url.as_str()), Some(details.token.as_str())),
            None => (None, None),
        };

        let result = sqlx::query(
            "UPDATE users SET frame_added = $1, notification_url = $2, notification_token = $3,
             updated_at = $4 WHERE fid = $5",
        )
        .bind(subscription.added)
        .bind(url)
        .bind(token)
        .bind(format_timestamp(&Utc::now()))
        .bind(fid_column(fid)?)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TodoStoreError::not_found("User", fid.to_string()));
        }
        self.require_user(fid).await
    }

    async fn create_todo(&self, todo: NewTodo) -> TodoStoreResult<Todo> {
        let todo = Todo::from_new(todo);

        sqlx::query(
            "INSERT INTO todos (id, user_fid, text, priority, completed, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(todo.id.to_string())
        .bind(fid_column(todo.user_fid)?)
        .bind(&todo.text)
        .bind(todo.priority)
        .bind(todo.completed)
        .bind(format_timestamp(&todo.created_at))
        .execute(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn get_todo(&self, id: Uuid) -> TodoStoreResult<Option<Todo>> {
        let row: Option<TodoRow> =
            sqlx::query_as(&format!("SELECT {} FROM todos WHERE id = $1", TODO_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Todo::try_from).transpose()
    }

    async fn list_open_todos(&self, fid: u64, limit: u32) -> TodoStoreResult<Vec<Todo>> {
        let rows: Vec<TodoRow> = sqlx::query_as(&format!(
            "SELECT {} FROM todos
             WHERE user_fid = $1 AND completed = FALSE
             ORDER BY created_at DESC
             LIMIT $2",
            TODO_COLUMNS
        ))
        .bind(fid_column(fid)?)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Todo::try_from).collect()
    }

    async fn complete_todo(
        &self,
        id: Uuid,
        fid: u64,
        completed_at: DateTime<Utc>,
    ) -> TodoStoreResult<bool> {
        let result = sqlx::query(
            "UPDATE todos SET completed = TRUE, completed_at = $1
             WHERE id = $2 AND user_fid = $3",
        )
        .bind(format_timestamp(&completed_at))
        .bind(id.to_string())
        .bind(fid_column(fid)?)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
