use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use domain::{Task, TaskId};
use infrastructure::TaskPatch;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::models::{CreateTaskRequest, MessageResponse, UpdateTaskRequest};
use crate::AppState;

pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let task = Task::new(auth.user_id, &req.title, req.description.as_deref())?;
    state.tasks.put(&task).await?;

    info!(task_id = %task.id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = state.tasks.list(&auth.user_id).await?;
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let task_id = TaskId::from_string(id);
    let task = state
        .tasks
        .get(&auth.user_id, &task_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(task))
}

pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.title.is_none() && req.description.is_none() && req.completed.is_none() {
        return Err(ApiError::BadRequest(
            "At least one of 'title', 'description' or 'completed' is required".to_string(),
        ));
    }

    let title = match req.title {
        Some(raw) => {
            let trimmed = raw.trim().to_string();
            if trimmed.is_empty() {
                return Err(ApiError::BadRequest("Title cannot be empty".to_string()));
            }
            Some(trimmed)
        }
        None => None,
    };

    let patch = TaskPatch {
        title,
        description: req.description.map(|d| d.trim().to_string()),
        completed: req.completed,
    };

    let task_id = TaskId::from_string(id);
    let task = state.tasks.update(&auth.user_id, &task_id, patch).await?;

    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let task_id = TaskId::from_string(id);
    state.tasks.delete(&auth.user_id, &task_id).await?;

    info!(task_id = %task_id, "Task removed");
    Ok(Json(MessageResponse {
        message: "Task removed".to_string(),
    }))
}
