use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{NewProject, Project, ProjectDetail, ProjectPatch};
use crate::state::AppState;
use crate::validation;

async fn with_tasks(state: &AppState, project: Project) -> Result<ProjectDetail, ApiError> {
    let tasks = state.store.tasks_in_project(project.id).await?;
    Ok(ProjectDetail { project, tasks })
}

/// GET /projects/ - List the caller's projects.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ProjectDetail>>, ApiError> {
    let projects = state.store.list_projects(user.id).await?;
    let mut details = Vec::with_capacity(projects.len());
    for project in projects {
        details.push(with_tasks(&state, project).await?);
    }
    Ok(Json(details))
}

/// POST /projects/ - Create a project owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NewProject>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    validation::check_project_name(&input.name)?;
    validation::check_project_dates(Some(input.start_date), Some(input.end_date))?;

    let project = Project {
        id: Uuid::new_v4(),
        name: input.name,
        description: input.description,
        start_date: input.start_date,
        end_date: input.end_date,
        created_by: user.id,
    };
    let project = state.store.create_project(project).await?;
    tracing::info!("project {} created by {}", project.id, user.id);

    let detail = with_tasks(&state, project).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /projects/:id/ - Fetch one owned project.
///
/// The lookup is fused with the ownership predicate, so a project owned by
/// someone else answers exactly like a missing one.
pub async fn retrieve(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectDetail>, ApiError> {
    let project = state
        .store
        .project_by_id(id, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;
    Ok(Json(with_tasks(&state, project).await?))
}

/// PUT /projects/:id/ - Partially update one owned project.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    payload: Result<Json<ProjectPatch>, JsonRejection>,
) -> Result<Json<ProjectDetail>, ApiError> {
    let Json(patch) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let mut project = state
        .store
        .project_by_id(id, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    if let Some(name) = &patch.name {
        validation::check_project_name(name)?;
    }
    // Cross-field check only when the patch carries both dates.
    validation::check_project_dates(patch.start_date, patch.end_date)?;

    project.apply(patch);
    let project = state.store.update_project(project).await?;
    Ok(Json(with_tasks(&state, project).await?))
}

/// DELETE /projects/:id/ - Superuser-only; privilege is checked before the
/// ownership-scoped lookup, so an unprivileged owner gets 403 while a
/// privileged non-owner still gets 404.
pub async fn destroy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !user.is_superuser {
        return Err(ApiError::forbidden(
            "You do not have permission to delete this project.",
        ));
    }

    if !state.store.delete_project(id, user.id).await? {
        return Err(ApiError::not_found("Project not found"));
    }
    tracing::info!("project {} deleted by {}", id, user.id);
    Ok(StatusCode::NO_CONTENT)
}
