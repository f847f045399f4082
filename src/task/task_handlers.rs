use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::{
    task_dto::{CreateTaskRequest, MessageResponse, UpdateTaskRequest, UpdateTaskResponse},
    task_models::TaskView,
};
use crate::{error::Result, middleware::ValidatedJson, state::AppState};

/// Create a task
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = crate::task::Task),
        (status = 400, description = "Missing or invalid field"),
        (status = 500, description = "Store failure")
    ),
    tag = "tasks"
)]
pub async fn create_task(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateTaskRequest>,
) -> Result<impl IntoResponse> {
    let task = state.task_service.create_task(payload).await?;

    tracing::debug!("Created task {} due at {}", task.id, task.due_at);

    Ok((StatusCode::CREATED, Json(task)))
}

/// List every task, timestamps rendered in the reference timezone
#[utoipa::path(
    get,
    path = "/tasks/all",
    responses(
        (status = 200, description = "All tasks", body = [TaskView]),
        (status = 500, description = "Store failure")
    ),
    tag = "tasks"
)]
pub async fn get_all_tasks(State(state): State<AppState>) -> Result<Json<Vec<TaskView>>> {
    let offset = state.config.utc_offset;
    let tasks = state.task_service.list_tasks().await?;

    Ok(Json(tasks.iter().map(|task| task.to_view(offset)).collect()))
}

/// Update a task; any edit reopens it
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = UpdateTaskResponse),
        (status = 400, description = "Invalid field"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateTaskRequest>,
) -> Result<Json<UpdateTaskResponse>> {
    let task = state.task_service.update_task(&task_id, payload).await?;

    Ok(Json(UpdateTaskResponse {
        message: "Task updated successfully".to_string(),
        task,
    }))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task deleted", body = MessageResponse),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.task_service.delete_task(&task_id).await?;

    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}
