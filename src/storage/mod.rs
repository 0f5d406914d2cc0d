//! SQLite-backed task store.
//!
//! All persistence goes through [`TaskStore`]; every operation is a single
//! parameterized statement, so atomicity is the store's single-statement
//! guarantee (no read-modify-write anywhere, see `toggle_status`).

use anyhow::{Context as _, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};

/// One row of the `tasks` table, also the wire representation.
///
/// Timestamps live as TEXT: `creation_date` is RFC 3339, `due_date` is
/// ISO `YYYY-MM-DD` — lexicographic order matches chronological order,
/// which the list sort relies on.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub status: bool,
    pub creation_date: String,
    pub due_date: String,
}

#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (or create) the database under `data_dir` and ensure the schema
    /// exists. Called once at startup; failure here is fatal to the process.
    pub async fn open(data_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .with_context(|| format!("creating data dir {}", data_dir.display()))?;
        let db_path = data_dir.join("taskflow.db");
        let opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true);

        let pool = SqlitePool::connect_with(opts)
            .await
            .context("opening SQLite database")?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Idempotent schema creation.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                status INTEGER NOT NULL DEFAULT 0,
                creation_date TEXT NOT NULL,
                due_date TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date);
            ",
        )
        .execute(&self.pool)
        .await
        .context("creating tasks table")?;
        Ok(())
    }

    /// All tasks, nearest due date first; on equal dates incomplete tasks
    /// sort before complete ones.
    pub async fn list_tasks(&self) -> Result<Vec<TaskRow>> {
        let rows = sqlx::query_as("SELECT * FROM tasks ORDER BY due_date ASC, status ASC")
            .fetch_all(&self.pool)
            .await
            .context("listing tasks")?;
        Ok(rows)
    }

    pub async fn get_task(&self, id: i64) -> Result<Option<TaskRow>> {
        let row = sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("loading task by id")?;
        Ok(row)
    }

    /// Insert a new pending task. `creation_date` is assigned here, once.
    pub async fn create_task(&self, title: &str, due_date: &str) -> Result<TaskRow> {
        let now = Utc::now().to_rfc3339();
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO tasks (title, status, creation_date, due_date)
             VALUES (?, 0, ?, ?)
             RETURNING id",
        )
        .bind(title)
        .bind(&now)
        .bind(due_date)
        .fetch_one(&self.pool)
        .await
        .context("inserting task")?;

        self.get_task(id)
            .await?
            .context("task not found after insert")
    }

    /// Set `status` to an explicit value. Returns affected-row count
    /// (0 means no task with that id).
    pub async fn set_status(&self, id: i64, status: bool) -> Result<u64> {
        let affected = sqlx::query("UPDATE tasks SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("setting task status")?
            .rows_affected();
        Ok(affected)
    }

    /// Atomic toggle — the complement is computed by SQLite inside a single
    /// UPDATE, so concurrent toggles never race on a stale read.
    pub async fn toggle_status(&self, id: i64) -> Result<u64> {
        let affected = sqlx::query("UPDATE tasks SET status = NOT status WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("toggling task status")?
            .rows_affected();
        Ok(affected)
    }

    /// Partial update: only the supplied columns are touched, omitted ones
    /// keep their value. Returns affected-row count.
    pub async fn update_fields(
        &self,
        id: i64,
        title: Option<&str>,
        due_date: Option<&str>,
    ) -> Result<u64> {
        let mut sets: Vec<&str> = Vec::new();
        if title.is_some() {
            sets.push("title = ?");
        }
        if due_date.is_some() {
            sets.push("due_date = ?");
        }
        if sets.is_empty() {
            return Ok(0);
        }

        let sql = format!("UPDATE tasks SET {} WHERE id = ?", sets.join(", "));
        let mut query = sqlx::query(&sql);
        if let Some(title) = title {
            query = query.bind(title);
        }
        if let Some(due_date) = due_date {
            query = query.bind(due_date);
        }
        let affected = query
            .bind(id)
            .execute(&self.pool)
            .await
            .context("updating task fields")?
            .rows_affected();
        Ok(affected)
    }

    /// Delete a task. Returns affected-row count (0 means no match).
    pub async fn delete_task(&self, id: i64) -> Result<u64> {
        let affected = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("deleting task")?
            .rows_affected();
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    async fn make_store() -> TaskStore {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        let store = TaskStore::new(pool);
        store.migrate().await.unwrap();
        store
    }

    #[tokio::test]
    async fn create_assigns_id_and_defaults() {
        let store = make_store().await;
        let task = store.create_task("Buy milk", "2025-01-01").await.unwrap();
        assert!(task.id > 0);
        assert_eq!(task.title, "Buy milk");
        assert!(!task.status);
        assert_eq!(task.due_date, "2025-01-01");
        assert!(!task.creation_date.is_empty());
    }

    #[tokio::test]
    async fn list_sorts_by_due_date_then_status() {
        let store = make_store().await;
        let late = store.create_task("late", "2025-03-01").await.unwrap();
        let early_done = store.create_task("early done", "2025-01-01").await.unwrap();
        let early_pending = store.create_task("early pending", "2025-01-01").await.unwrap();
        store.set_status(early_done.id, true).await.unwrap();

        let rows = store.list_tasks().await.unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        // Same due date: pending before done. Later date last.
        assert_eq!(ids, vec![early_pending.id, early_done.id, late.id]);
    }

    #[tokio::test]
    async fn toggle_twice_returns_to_original() {
        let store = make_store().await;
        let task = store.create_task("flip me", "2025-01-01").await.unwrap();

        assert_eq!(store.toggle_status(task.id).await.unwrap(), 1);
        assert!(store.get_task(task.id).await.unwrap().unwrap().status);

        assert_eq!(store.toggle_status(task.id).await.unwrap(), 1);
        assert!(!store.get_task(task.id).await.unwrap().unwrap().status);
    }

    #[tokio::test]
    async fn explicit_set_overrides_current_value() {
        let store = make_store().await;
        let task = store.create_task("set me", "2025-01-01").await.unwrap();
        store.set_status(task.id, true).await.unwrap();
        store.set_status(task.id, true).await.unwrap();
        assert!(store.get_task(task.id).await.unwrap().unwrap().status);
    }

    #[tokio::test]
    async fn partial_update_leaves_other_column() {
        let store = make_store().await;
        let task = store.create_task("old title", "2025-01-01").await.unwrap();

        let affected = store
            .update_fields(task.id, Some("new title"), None)
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let row = store.get_task(task.id).await.unwrap().unwrap();
        assert_eq!(row.title, "new title");
        assert_eq!(row.due_date, "2025-01-01");
    }

    #[tokio::test]
    async fn update_with_no_fields_is_a_no_op() {
        let store = make_store().await;
        let task = store.create_task("untouched", "2025-01-01").await.unwrap();
        assert_eq!(store.update_fields(task.id, None, None).await.unwrap(), 0);
        let row = store.get_task(task.id).await.unwrap().unwrap();
        assert_eq!(row.title, "untouched");
    }

    #[tokio::test]
    async fn mutations_on_missing_id_affect_zero_rows() {
        let store = make_store().await;
        assert_eq!(store.toggle_status(9999).await.unwrap(), 0);
        assert_eq!(store.set_status(9999, true).await.unwrap(), 0);
        assert_eq!(
            store.update_fields(9999, Some("x"), None).await.unwrap(),
            0
        );
        assert_eq!(store.delete_task(9999).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let store = make_store().await;
        let task = store.create_task("doomed", "2025-01-01").await.unwrap();
        assert_eq!(store.delete_task(task.id).await.unwrap(), 1);
        assert!(store.get_task(task.id).await.unwrap().is_none());
        assert_eq!(store.delete_task(task.id).await.unwrap(), 0);
    }
}
