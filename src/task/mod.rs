pub mod due_time;
pub mod memory_repository;
pub mod task_dto;
pub mod task_handlers;
pub mod task_models;
pub mod task_repository;
pub mod task_service;

pub use memory_repository::InMemoryTaskStore;
pub use task_dto::{CreateTaskRequest, MessageResponse, UpdateTaskRequest, UpdateTaskResponse};
pub use task_handlers::{create_task, delete_task, get_all_tasks, update_task};
pub use task_models::{Task, TaskView};
pub use task_repository::{TaskRepository, TaskStore};
pub use task_service::TaskService;
