//! HTTP handlers for the task API
//!
//! Each handler parses its inputs, calls one [`TaskService`] operation and
//! wraps the result. Status codes for failures come from
//! [`Error`](crate::error::Error)'s `IntoResponse`.
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | `POST` | `/api/tasks` | 201 `{message, task_id}` |
//! | `GET` | `/api/tasks` | 200 `{message, data, pagination, sorting}` |
//! | `GET` | `/api/tasks/{task_id}` | 200 `{message, task}` |
//! | `PUT` | `/api/tasks/{task_id}` | 200 `{message, task}` |
//! | `DELETE` | `/api/tasks/{task_id}` | 200 `{message}` |
//! | `GET` | `/health` | 200 |
//!
//! [`TaskService`]: crate::service::TaskService

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    model::{NewTask, Task, TaskUpdate},
    query::{FilterBuilder, FilterParams, PageConfig, PageParams},
    service::{PaginationInfo, SortingInfo},
    state::AppState,
    validation::{validate_task_id, ValidationError},
};

/// Body with only a message
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of a successful create
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub task_id: u64,
}

/// Body carrying a single task
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    pub message: String,
    pub task: Task,
}

/// Body of a listing
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub message: String,
    pub data: Vec<Task>,
    pub pagination: PaginationInfo,
    pub sorting: SortingInfo,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{task_id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .with_state(state)
}

/// Liveness check
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn create_task(
    State(state): State<AppState>,
    body: std::result::Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let Json(new_task) = body.map_err(invalid_body)?;
    let task_id = state.tasks().create(new_task).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Task created successfully".to_string(),
            task_id,
        }),
    ))
}

async fn list_tasks(
    State(state): State<AppState>,
    Query(filter_params): Query<FilterParams>,
    Query(page_params): Query<PageParams>,
) -> Result<Json<ListResponse>> {
    let filters = FilterBuilder::from_params(&filter_params)?;
    let page = PageConfig::from_params(&page_params)?;

    let listing = state.tasks().list(&filters, &page).await?;

    Ok(Json(ListResponse {
        message: "Tasks retrieved successfully".to_string(),
        data: listing.tasks,
        pagination: listing.pagination,
        sorting: listing.sorting,
    }))
}

async fn get_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<TaskResponse>> {
    let id = validate_task_id(&raw_id)?;
    let task = state.tasks().get(id).await?;

    Ok(Json(TaskResponse {
        message: "Task retrieved successfully".to_string(),
        task,
    }))
}

async fn update_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: std::result::Result<Json<TaskUpdate>, JsonRejection>,
) -> Result<Json<TaskResponse>> {
    let id = validate_task_id(&raw_id)?;
    let Json(update) = body.map_err(invalid_body)?;
    let task = state.tasks().update(id, update).await?;

    Ok(Json(TaskResponse {
        message: "Task updated successfully".to_string(),
        task,
    }))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = validate_task_id(&raw_id)?;
    state.tasks().delete(id).await?;

    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

fn invalid_body(rejection: JsonRejection) -> ValidationError {
    ValidationError::InvalidBody(rejection.body_text())
}
