//! Relational task store backed by SQLite.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use entities::{NewTask, Task, TaskPriority, TaskStatus, TaskUpdate};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    FromRow, Pool, QueryBuilder, Sqlite,
};
use uuid::Uuid;

use crate::{TaskFilter, TaskStore, TaskStoreError, TaskStoreResult};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL CHECK (length(title) BETWEEN 1 AND 100),
    description TEXT CHECK (description IS NULL OR length(description) <= 500),
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'in_progress', 'done')),
    priority TEXT NOT NULL DEFAULT 'medium'
        CHECK (priority IN ('low', 'medium', 'high')),
    due_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks (created_at);
"#;

const TASK_COLUMNS: &str =
    "id, title, description, status, priority, due_date, created_at, updated_at";

/// Database row for Task
#[derive(Debug, FromRow)]
struct TaskRow {
    id: String,
    title: String,
    description: Option<String>,
    status: String,
    priority: String,
    due_date: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = TaskStoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task {
            id: Uuid::parse_str(&row.id).map_err(|_| corrupt("id", row.id.clone()))?,
            title: row.title,
            description: row.description,
            status: TaskStatus::parse(&row.status).ok_or_else(|| corrupt("status", row.status))?,
            priority: TaskPriority::parse(&row.priority)
                .ok_or_else(|| corrupt("priority", row.priority))?,
            due_date: row
                .due_date
                .map(|value| parse_timestamp("due_date", value))
                .transpose()?,
            created_at: parse_timestamp("created_at", row.created_at)?,
            updated_at: Some(parse_timestamp("updated_at", row.updated_at)?),
        })
    }
}

fn corrupt(column: &'static str, value: String) -> TaskStoreError {
    TaskStoreError::Corrupt { column, value }
}

fn parse_timestamp(column: &'static str, value: String) -> TaskStoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| corrupt(column, value))
}

/// Fixed-width UTC text, so lexical order in SQL equals chronological order.
/// Whether `url` names an in-memory database, either `sqlite::memory:` or a
/// URL carrying `mode=memory`.
fn is_in_memory_url(url: &str) -> bool {
    url.contains(":memory:")
        || url
            .split_once('?')
            .is_some_and(|(_, query)| query.split('&').any(|pair| pair == "mode=memory"))
}

fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// SQLite task store.
///
/// Maintains `updated_at` on every mutation.
#[derive(Debug, Clone)]
pub struct SqliteTaskStore {
    pool: Pool<Sqlite>,
}

impl SqliteTaskStore {
    /// Connects to the database at `url` and creates the schema if needed.
    ///
    /// An in-memory URL is served by a single long-lived connection, since
    /// every SQLite connection would otherwise see its own empty database.
    pub async fn connect(url: &str) -> TaskStoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool_options = if is_in_memory_url(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(options).await?;

        Self::from_pool(pool).await
    }

    /// Wraps an existing pool and creates the schema if needed.
    pub async fn from_pool(pool: Pool<Sqlite>) -> TaskStoreResult<Self> {
        let store = Self { pool };
        store.sync_schema().await?;
        Ok(store)
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    async fn sync_schema(&self) -> TaskStoreResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        tracing::debug!("Task schema synchronized");
        Ok(())
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn create_task(&self, task: NewTask) -> TaskStoreResult<Task> {
        let mut task = Task::create(task)?;
        task.updated_at = Some(task.created_at);

        sqlx::query(
            "INSERT INTO tasks (id, title, description, status, priority, due_date, \
             created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(task.id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.due_date.as_ref().map(format_timestamp))
        .bind(format_timestamp(&task.created_at))
        .bind(format_timestamp(&task.created_at))
        .execute(&self.pool)
        .await?;

        Ok(task)
    }

    async fn get_task(&self, id: Uuid) -> TaskStoreResult<Option<Task>> {
        let row: Option<TaskRow> =
            sqlx::query_as(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Task::try_from).transpose()
    }

    async fn list_tasks(&self, filter: TaskFilter) -> TaskStoreResult<Vec<Task>> {
        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {TASK_COLUMNS} FROM tasks WHERE 1 = 1"));
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(priority) = filter.priority {
            query.push(" AND priority = ").push_bind(priority.as_str());
        }
        query.push(" ORDER BY created_at DESC, rowid DESC");

        let rows: Vec<TaskRow> = query.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(Task::try_from).collect()
    }

    async fn update_task(&self, id: Uuid, update: TaskUpdate) -> TaskStoreResult<Task> {
        let mut tx = self.pool.begin().await?;

        let row: Option<TaskRow> =
            sqlx::query_as(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&mut *tx)
                .await?;
        let current = row
            .map(Task::try_from)
            .transpose()?
            .ok_or_else(|| TaskStoreError::not_found("Task", id.to_string()))?;

        let mut task = current.apply(update)?;
        let now = Utc::now();
        task.updated_at = Some(now);

        sqlx::query(
            "UPDATE tasks SET title = ?, description = ?, status = ?, priority = ?, \
             due_date = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.due_date.as_ref().map(format_timestamp))
        .bind(format_timestamp(&now))
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(task)
    }

    async fn delete_task(&self, id: Uuid) -> TaskStoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TaskStoreError::not_found("Task", id.to_string()));
        }
        Ok(())
    }
}
