use axum::{
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{login, projects, tasks};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/projects/", get(projects::list).post(projects::create))
        .route(
            "/projects/:id/",
            get(projects::retrieve)
                .put(projects::update)
                .delete(projects::destroy),
        )
        .route("/tasks/", get(tasks::list).post(tasks::create))
        .route(
            "/tasks/:id/",
            get(tasks::retrieve).put(tasks::update).delete(tasks::destroy),
        )
        .route_layer(middleware::from_fn(jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/login/", post(login::login))
        // Protected API behind bearer auth
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Taskflow API",
        "version": version,
        "description": "Project and task tracking REST API",
        "endpoints": {
            "login": "POST /login/ (public)",
            "projects": "GET|POST /projects/, GET|PUT|DELETE /projects/:id/ (bearer auth)",
            "tasks": "GET|POST /tasks/, GET|PUT|DELETE /tasks/:id/ (bearer auth)",
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => {
            // Log the real cause but keep the client body generic.
            tracing::error!("store health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "store": "unavailable"
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Project, Task, User};
    use crate::state::AppState;
    use crate::store::{MemoryStore, RecordStore, StoreError};
    use async_trait::async_trait;
    use axum::extract::State;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use uuid::Uuid;

    /// Store whose backend is unreachable; every call fails the same way.
    struct DownStore;

    impl DownStore {
        fn err() -> StoreError {
            StoreError::Connection("connection refused (127.0.0.1:5432)".to_string())
        }
    }

    #[async_trait]
    impl RecordStore for DownStore {
        async fn ping(&self) -> Result<(), StoreError> {
            Err(Self::err())
        }
        async fn user_by_username(&self, _: &str) -> Result<Option<User>, StoreError> {
            Err(Self::err())
        }
        async fn list_projects(&self, _: Uuid) -> Result<Vec<Project>, StoreError> {
            Err(Self::err())
        }
        async fn create_project(&self, _: Project) -> Result<Project, StoreError> {
            Err(Self::err())
        }
        async fn project_by_id(&self, _: Uuid, _: Uuid) -> Result<Option<Project>, StoreError> {
            Err(Self::err())
        }
        async fn project_exists(&self, _: Uuid) -> Result<bool, StoreError> {
            Err(Self::err())
        }
        async fn update_project(&self, _: Project) -> Result<Project, StoreError> {
            Err(Self::err())
        }
        async fn delete_project(&self, _: Uuid, _: Uuid) -> Result<bool, StoreError> {
            Err(Self::err())
        }
        async fn list_tasks(&self, _: Uuid) -> Result<Vec<Task>, StoreError> {
            Err(Self::err())
        }
        async fn tasks_in_project(&self, _: Uuid) -> Result<Vec<Task>, StoreError> {
            Err(Self::err())
        }
        async fn create_task(&self, _: Task) -> Result<Task, StoreError> {
            Err(Self::err())
        }
        async fn task_by_id(&self, _: Uuid, _: Uuid) -> Result<Option<Task>, StoreError> {
            Err(Self::err())
        }
        async fn update_task(&self, _: Task) -> Result<Task, StoreError> {
            Err(Self::err())
        }
        async fn delete_task(&self, _: Uuid, _: Uuid) -> Result<bool, StoreError> {
            Err(Self::err())
        }
    }

    async fn health_body(state: AppState) -> (StatusCode, serde_json::Value) {
        let response = health(State(state)).await.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn healthy_store_reports_ok() {
        let (status, body) = health_body(AppState::new(Arc::new(MemoryStore::new()))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "ok");
    }

    #[tokio::test]
    async fn degraded_health_does_not_expose_the_store_error() {
        let (status, body) = health_body(AppState::new(Arc::new(DownStore))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["store"], "unavailable");
        // The underlying cause stays in the logs, not the body.
        assert!(!body.to_string().contains("connection refused"));
    }
}
