//! SQLite todo store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::{FrameSubscription, NewTodo, Todo, User};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use uuid::Uuid;

use crate::schema::{
    fid_column, format_timestamp, TodoRow, UserRow, SQLITE_SCHEMA, TODO_COLUMNS, USER_COLUMNS,
};
use crate::{TodoStore, TodoStoreError, TodoStoreResult};

/// SQLite-backed todo store (single-process deployments).
#[derive(Debug, Clone)]
pub struct SqliteTodoStore {
    pool: Pool<Sqlite>,
}

impl SqliteTodoStore {
    /// Connects to `database_url` and creates the schema if needed.
    pub async fn connect(database_url: &str) -> TodoStoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Self::from_pool(pool).await
    }

    /// Opens a private in-memory database.
    ///
    /// Every connection to `sqlite::memory:` sees its own database, so the
    /// pool is capped at one connection.
    pub async fn in_memory() -> TodoStoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    /// Wraps an existing pool and creates the schema if needed.
    pub async fn from_pool(pool: Pool<Sqlite>) -> TodoStoreResult<Self> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    async fn run_migrations(&self) -> TodoStoreResult<()> {
        sqlx::raw_sql(SQLITE_SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| TodoStoreError::Migration(e.to_string()))?;
        tracing::debug!("SQLite schema ready");
        Ok(())
    }

    async fn require_user(&self, fid: u64) -> TodoStoreResult<User> {
        self.get_user(fid)
            .await?
            .ok_or_else(|| TodoStoreError::not_found("User", fid.to_string()))
    }
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
    async fn ensure_user(&self, fid: u64) -> TodoStoreResult<User> {
        let now = format_timestamp(&Utc::now());

        let result = sqlx::query(
            "INSERT INTO users (fid, streak_count, frame_added, created_at, updated_at)
             VALUES (?, 0, 0, ?, ?)
             ON CONFLICT(fid) DO NOTHING",
        )
        .bind(fid_column(fid)?)
        .bind(&now)
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
            sqlx::query_as(&format!("SELECT {} FROM users WHERE fid = ?", USER_COLUMNS))
                .bind(fid_column(fid)?)
                .fetch_optional(&self.pool)
                .await?;

        row.map(User::try_from).transpose()
    }

    async fn set_wallet_address(&self, fid: u64, address: &str) -> TodoStoreResult<User> {
        let result =
            sqlx::query("UPDATE users SET wallet_address = ?, updated_at = ? WHERE fid = ?")
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
            "UPDATE users SET frame_added = ?, notification_url = ?, notification_token = ?,
             updated_at = ? WHERE fid = ?",
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
             VALUES (?, ?, ?, ?, ?, ?)",
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
            sqlx::query_as(&format!("SELECT {} FROM todos WHERE id = ?", TODO_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Todo::try_from).transpose()
    }

    async fn list_open_todos(&self, fid: u64, limit: u32) -> TodoStoreResult<Vec<Todo>> {
        let rows: Vec<TodoRow> = sqlx::query_as(&format!(
            "SELECT {} FROM todos
             WHERE user_fid = ? AND completed = ?
             ORDER BY created_at DESC
             LIMIT ?",
            TODO_COLUMNS
        ))
        .bind(fid_column(fid)?)
        .bind(false)
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
            "UPDATE todos SET completed = ?, completed_at = ?
             WHERE id = ? AND user_fid = ?",
        )
        .bind(true)
        .bind(format_timestamp(&completed_at))
        .bind(id.to_string())
        .bind(fid_column(fid)?)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use entities::NotificationDetails;

    use super::*;

    async fn store_with_user(fid: u64) -> SqliteTodoStore {
        let store = SqliteTodoStore::in_memory().await.unwrap();
        store.ensure_user(fid).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_ensure_user_inserts_once() {
        let store = SqliteTodoStore::in_memory().await.unwrap();

        let first = store.ensure_user(77).await.unwrap();
        let second = store.ensure_user(77).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.streak_count, 0);
        assert!(first.wallet_address.is_none());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let store = store_with_user(1).await;
        for text in ["one", "two", "three", "four", "five", "six"] {
            store
                .create_todo(NewTodo::from_input(1, text).unwrap())
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let open = store.list_open_todos(1, 5).await.unwrap();
        let texts: Vec<_> = open.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["six", "five", "four", "three", "two"]);
        assert!(open.iter().all(|t| t.priority == 4 && !t.completed));
    }

    #[tokio::test]
    async fn test_complete_filters_owner() {
        let store = store_with_user(1).await;
        store.ensure_user(2).await.unwrap();
        let todo = store
            .create_todo(NewTodo::from_input(1, "mine").unwrap())
            .await
            .unwrap();

        assert!(!store.complete_todo(todo.id, 2, Utc::now()).await.unwrap());
        assert!(!store.get_todo(todo.id).await.unwrap().unwrap().completed);

        assert!(store.complete_todo(todo.id, 1, Utc::now()).await.unwrap());
        let stored = store.get_todo(todo.id).await.unwrap().unwrap();
        assert!(stored.completed);
        assert!(stored.completed_at.is_some());
        assert!(store.list_open_todos(1, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wallet_and_subscription() {
        let store = store_with_user(5).await;

        let user = store
            .set_wallet_address(5, "0x52908400098527886E0F7030069857D2E4169EE7")
            .await
            .unwrap();
        assert!(user.wallet_address.is_some());

        let subscription = FrameSubscription::added(Some(NotificationDetails {
            url: "https://relay.example".to_string(),
            token: "abc".to_string(),
        }));
        let user = store.set_subscription(5, &subscription).await.unwrap();
        assert_eq!(user.subscription, subscription);

        let user = store
            .set_subscription(5, &FrameSubscription::removed())
            .await
            .unwrap();
        assert!(!user.subscription.added);
        assert!(user.subscription.notification.is_none());

        assert!(store.set_wallet_address(6, "0x00").await.is_err());
    }
}
