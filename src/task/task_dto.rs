use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::task_models::Task;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(
        required(message = "Title is required"),
        length(min = 1, message = "Title is required")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "Description is required"),
        length(min = 1, message = "Description is required")
    )]
    pub description: Option<String>,
    /// Wall-clock date and time in the reference timezone, or an RFC 3339
    /// timestamp.
    #[serde(alias = "datetime")]
    #[validate(
        required(message = "Due time is required"),
        length(min = 1, message = "Due time is required")
    )]
    pub due_at: Option<String>,
    #[serde(alias = "pushToken")]
    pub device_token: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,
    /// Blank leaves the stored due time unchanged.
    #[serde(alias = "datetime")]
    pub due_at: Option<String>,
    /// Empty string clears the stored token.
    #[serde(alias = "pushToken")]
    pub device_token: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateTaskResponse {
    pub message: String,
    pub task: Task,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
