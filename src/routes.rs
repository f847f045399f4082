use crate::{
    state::AppState,
    task::{
        self, CreateTaskRequest, MessageResponse, Task, TaskView, UpdateTaskRequest,
        UpdateTaskResponse,
    },
};
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        task::task_handlers::create_task,
        task::task_handlers::get_all_tasks,
        task::task_handlers::update_task,
        task::task_handlers::delete_task,
    ),
    components(
        schemas(
            CreateTaskRequest,
            UpdateTaskRequest,
            UpdateTaskResponse,
            MessageResponse,
            Task,
            TaskView,
        )
    ),
    tags(
        (name = "tasks", description = "Reminder task endpoints")
    )
)]
struct ApiDoc;

async fn root() -> &'static str {
    "To-Do Backend Running!"
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let task_routes = Router::new()
        .route("/", post(task::create_task))
        .route("/all", get(task::get_all_tasks))
        .route("/:id", put(task::update_task).delete(task::delete_task));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(root))
        .nest("/tasks", task_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
