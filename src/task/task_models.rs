use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::due_time::format_in_offset;

/// Width of the due window looked back over by each sweep, in seconds.
pub const DUE_WINDOW_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub due_at: DateTime<Utc>,
    pub device_token: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Whether the task is still open and its due time falls in
    /// `[now - DUE_WINDOW_SECS, now]`.
    pub fn is_due_incomplete(&self, now: DateTime<Utc>) -> bool {
        let window_start = now - chrono::Duration::seconds(DUE_WINDOW_SECS);
        !self.completed && self.due_at >= window_start && self.due_at <= now
    }

    pub fn to_view(&self, offset: FixedOffset) -> TaskView {
        TaskView {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            due_at: format_in_offset(self.due_at, offset),
            device_token: self.device_token.clone(),
            completed: self.completed,
            created_at: format_in_offset(self.created_at, offset),
            updated_at: format_in_offset(self.updated_at, offset),
        }
    }
}

/// A task with its timestamps rendered in the reference timezone.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub due_at: String,
    pub device_token: Option<String>,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_at: DateTime<Utc>,
    pub device_token: Option<String>,
}

/// Field replacements for an update. `None` leaves the stored value as is;
/// `device_token: Some(None)` clears the token.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub device_token: Option<Option<String>>,
}

impl TaskChanges {
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(due_at) = self.due_at {
            task.due_at = due_at;
        }
        if let Some(device_token) = self.device_token {
            task.device_token = device_token;
        }
        task.completed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::due_time::default_offset;

    fn task_due_at(due_at: DateTime<Utc>) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Call mom".into(),
            description: "Sunday call".into(),
            due_at,
            device_token: None,
            completed: false,
            created_at: due_at,
            updated_at: due_at,
        }
    }

    #[test]
    fn test_due_window_bounds_are_inclusive() {
        let now = Utc::now();
        let window = chrono::Duration::seconds(DUE_WINDOW_SECS);
        let one = chrono::Duration::seconds(1);

        assert!(task_due_at(now).is_due_incomplete(now));
        assert!(task_due_at(now - window).is_due_incomplete(now));
        assert!(!task_due_at(now + one).is_due_incomplete(now));
        assert!(!task_due_at(now - window - one).is_due_incomplete(now));
    }

    #[test]
    fn test_completed_task_is_never_due() {
        let now = Utc::now();
        let mut task = task_due_at(now);
        task.completed = true;
        assert!(!task.is_due_incomplete(now));
    }

    #[test]
    fn test_apply_changes_resets_completed() {
        let now = Utc::now();
        let mut task = task_due_at(now);
        task.completed = true;
        task.device_token = Some("ExponentPushToken[abc]".into());

        TaskChanges {
            title: Some("Call dad".into()),
            ..TaskChanges::default()
        }
        .apply(&mut task);

        assert_eq!(task.title, "Call dad");
        assert_eq!(task.description, "Sunday call");
        assert_eq!(task.due_at, now);
        assert_eq!(task.device_token.as_deref(), Some("ExponentPushToken[abc]"));
        assert!(!task.completed);
    }

    #[test]
    fn test_view_renders_reference_offset() {
        let due = DateTime::parse_from_rfc3339("2024-03-10T04:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let view = task_due_at(due).to_view(default_offset());
        assert_eq!(view.due_at, "2024-03-10 09:30:00 +05:30");

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("dueAt").is_some());
        assert!(json.get("deviceToken").is_some());
    }
}
