use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    task_models::{NewTask, Task, TaskChanges},
    task_repository::TaskStore,
};
use crate::error::Result;

/// Process-local task store, used when no database is configured.
#[derive(Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<DashMap<Uuid, Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// Keeps `updated_at` strictly increasing so it can serve as a write version.
fn next_stamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, task: NewTask) -> Result<Task> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: task.title,
            description: task.description,
            due_at: task.due_at,
            device_token: task.device_token,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        self.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_all(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn update(&self, id: Uuid, changes: TaskChanges) -> Result<Option<Task>> {
        let Some(mut entry) = self.tasks.get_mut(&id) else {
            return Ok(None);
        };
        let task = entry.value_mut();
        changes.apply(task);
        task.updated_at = next_stamp(task.updated_at);
        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        Ok(self.tasks.remove(&id).map_or(0, |_| 1))
    }

    async fn find_due_incomplete(&self, now: DateTime<Utc>) -> Result<Vec<Task>> {
        Ok(self
            .tasks
            .iter()
            .filter(|entry| entry.value().is_due_incomplete(now))
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn mark_completed(&self, id: Uuid, seen_updated_at: DateTime<Utc>) -> Result<bool> {
        let Some(mut entry) = self.tasks.get_mut(&id) else {
            return Ok(false);
        };
        let task = entry.value_mut();
        if task.completed || task.updated_at != seen_updated_at {
            return Ok(false);
        }
        task.completed = true;
        task.updated_at = next_stamp(task.updated_at);
        Ok(true)
    }
}
