use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{NewTask, Task, TaskPatch};
use crate::state::AppState;
use crate::validation;

/// The referenced project must exist, but it may belong to anyone: task
/// ownership is by assignee and never consults the project's owner.
async fn check_project_ref(state: &AppState, project: Uuid) -> Result<(), ApiError> {
    if state.store.project_exists(project).await? {
        return Ok(());
    }
    let mut field_errors = HashMap::new();
    field_errors.insert(
        "project".to_string(),
        "Referenced project does not exist.".to_string(),
    );
    Err(ApiError::field_errors("Invalid input", field_errors))
}

/// GET /tasks/ - List the caller's assigned tasks.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.store.list_tasks(user.id).await?;
    Ok(Json(tasks))
}

/// POST /tasks/ - Create a task assigned to the caller.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    validation::check_task_title(&input.title)?;
    validation::check_task_dates(Some(input.start_date), Some(input.due_date))?;
    check_project_ref(&state, input.project).await?;

    let task = Task {
        id: Uuid::new_v4(),
        title: input.title,
        description: input.description,
        status: input.status,
        priority: input.priority,
        start_date: input.start_date,
        due_date: input.due_date,
        assigned_to: user.id,
        project: input.project,
    };
    let task = state.store.create_task(task).await?;
    tracing::info!("task {} created by {}", task.id, user.id);
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /tasks/:id/ - Fetch one assigned task; foreign tasks answer as 404.
pub async fn retrieve(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, ApiError> {
    let task = state
        .store
        .task_by_id(id, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    Ok(Json(task))
}

/// PUT /tasks/:id/ - Partially update one assigned task.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(patch) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let mut task = state
        .store
        .task_by_id(id, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    if let Some(title) = &patch.title {
        validation::check_task_title(title)?;
    }
    // Cross-field check only when the patch carries both dates.
    validation::check_task_dates(patch.start_date, patch.due_date)?;
    if let Some(project) = patch.project {
        check_project_ref(&state, project).await?;
    }

    task.apply(patch);
    let task = state.store.update_task(task).await?;
    Ok(Json(task))
}

/// DELETE /tasks/:id/ - Assignee only; no privilege requirement.
pub async fn destroy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete_task(id, user.id).await? {
        return Err(ApiError::not_found("Task not found"));
    }
    tracing::info!("task {} deleted by {}", id, user.id);
    Ok(StatusCode::NO_CONTENT)
}
