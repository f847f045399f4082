use chrono::FixedOffset;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    due_time::parse_due_at,
    task_dto::{CreateTaskRequest, UpdateTaskRequest},
    task_models::{NewTask, Task, TaskChanges},
    task_repository::TaskStore,
};
use crate::error::{AppError, Result};

/// Service layer for task business logic: required fields, due time
/// normalization and not-found mapping on top of a [`TaskStore`].
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    utc_offset: FixedOffset,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, utc_offset: FixedOffset) -> Self {
        Self { store, utc_offset }
    }

    pub async fn create_task(&self, payload: CreateTaskRequest) -> Result<Task> {
        let title = required(payload.title, "Title is required")?;
        let description = required(payload.description, "Description is required")?;
        let due_at = required(payload.due_at, "Due time is required")?;
        let due_at = parse_due_at(&due_at, self.utc_offset)
            .ok_or_else(|| AppError::Validation("Invalid datetime format".into()))?;

        self.store
            .create(NewTask {
                title,
                description,
                due_at,
                device_token: payload.device_token.filter(|t| !t.is_empty()),
            })
            .await
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.store.find_all().await
    }

    pub async fn update_task(&self, task_id: &str, payload: UpdateTaskRequest) -> Result<Task> {
        let id = parse_task_id(task_id)?;

        let due_at = match payload.due_at.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(
                parse_due_at(raw, self.utc_offset)
                    .ok_or_else(|| AppError::Validation("Invalid datetime format".into()))?,
            ),
            _ => None,
        };

        let changes = TaskChanges {
            title: not_blank(payload.title, "Title must not be empty")?,
            description: not_blank(payload.description, "Description must not be empty")?,
            due_at,
            device_token: payload
                .device_token
                .map(|t| if t.is_empty() { None } else { Some(t) }),
        };

        self.store
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<()> {
        let id = parse_task_id(task_id)?;

        if self.store.delete(id).await? == 0 {
            return Err(AppError::NotFound("Task not found".into()));
        }
        Ok(())
    }
}

fn required(value: Option<String>, message: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}

// Absent stays absent; present must carry text.
fn not_blank(value: Option<String>, message: &str) -> Result<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => Err(AppError::Validation(message.to_string())),
        other => Ok(other),
    }
}

// An id that cannot name a record is reported like an unknown one.
fn parse_task_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Task not found".into()))
}
