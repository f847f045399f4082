use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::task_models::{NewTask, Task, TaskChanges, DUE_WINDOW_SECS};
use crate::error::Result;

/// Persistence operations on the task collection.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create(&self, task: NewTask) -> Result<Task>;

    async fn find_all(&self) -> Result<Vec<Task>>;

    /// Applies `changes` and resets `completed`. `None` when `id` is unknown.
    async fn update(&self, id: Uuid, changes: TaskChanges) -> Result<Option<Task>>;

    /// Returns the number of deleted records.
    async fn delete(&self, id: Uuid) -> Result<u64>;

    /// Incomplete tasks with `now - DUE_WINDOW_SECS <= due_at <= now`.
    async fn find_due_incomplete(&self, now: DateTime<Utc>) -> Result<Vec<Task>>;

    /// Marks the task completed if it is still incomplete and has not been
    /// written since `seen_updated_at`. Returns whether the write happened.
    async fn mark_completed(&self, id: Uuid, seen_updated_at: DateTime<Utc>) -> Result<bool>;
}

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for TaskRepository {
    async fn create(&self, task: NewTask) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (title, description, due_at, device_token)
             VALUES ($1, $2, $3, $4)
             RETURNING *"
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_at)
        .bind(&task.device_token)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn find_all(&self) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn update(&self, id: Uuid, changes: TaskChanges) -> Result<Option<Task>> {
        let replace_token = changes.device_token.is_some();
        let device_token = changes.device_token.flatten();

        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                due_at = COALESCE($3, due_at),
                device_token = CASE WHEN $4 THEN $5 ELSE device_token END,
                completed = false,
                updated_at = NOW()
             WHERE id = $6
             RETURNING *"
        )
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.due_at)
        .bind(replace_token)
        .bind(device_token)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn find_due_incomplete(&self, now: DateTime<Utc>) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks
             WHERE completed = false
             AND due_at >= $1
             AND due_at <= $2"
        )
        .bind(now - Duration::seconds(DUE_WINDOW_SECS))
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn mark_completed(&self, id: Uuid, seen_updated_at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE tasks SET completed = true, updated_at = NOW()
             WHERE id = $1 AND completed = false AND updated_at = $2"
        )
        .bind(id)
        .bind(seen_updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
