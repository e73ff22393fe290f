use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use taskflow_api::auth::hash_password;
use taskflow_api::models::User;
use taskflow_api::routes::app;
use taskflow_api::state::AppState;
use taskflow_api::store::MemoryStore;

/// Router backed by a fresh in-memory store seeded with three accounts:
/// alice and bob (regular) and root (superuser).
pub fn seeded_app() -> Router {
    let store = MemoryStore::new();
    for (username, password, is_superuser) in [
        ("alice", "alice-pw", false),
        ("bob", "bob-pw", false),
        ("root", "root-pw", true),
    ] {
        store.seed_user(User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: hash_password(password),
            is_superuser,
        });
    }
    app(AppState::new(Arc::new(store)))
}

/// Fire one request at the router and return (status, parsed JSON body).
/// Empty bodies (204) come back as `Value::Null`.
pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&value)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}

/// Log in through the API and return the access token.
#[allow(dead_code)]
pub async fn login(app: &Router, username: &str, password: &str) -> Result<String> {
    let (status, body) = request(
        app,
        Method::POST,
        "/login/",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, body);
    Ok(body["access"]
        .as_str()
        .expect("access token in login response")
        .to_string())
}

/// Create a project through the API and return its id.
#[allow(dead_code)]
pub async fn create_project(app: &Router, token: &str, name: &str) -> Result<Uuid> {
    let (status, body) = request(
        app,
        Method::POST,
        "/projects/",
        Some(token),
        Some(json!({
            "name": name,
            "description": "test project",
            "start_date": "2024-01-01",
            "end_date": "2024-12-31",
        })),
    )
    .await?;
    anyhow::ensure!(
        status == StatusCode::CREATED,
        "project create failed: {} {}",
        status,
        body
    );
    Ok(body["id"].as_str().expect("project id").parse()?)
}

/// Create a task in `project` through the API and return its id.
#[allow(dead_code)]
pub async fn create_task(app: &Router, token: &str, project: Uuid, title: &str) -> Result<Uuid> {
    let (status, body) = request(
        app,
        Method::POST,
        "/tasks/",
        Some(token),
        Some(json!({
            "title": title,
            "description": "test task",
            "start_date": "2024-02-01",
            "due_date": "2024-03-01",
            "project": project,
        })),
    )
    .await?;
    anyhow::ensure!(
        status == StatusCode::CREATED,
        "task create failed: {} {}",
        status,
        body
    );
    Ok(body["id"].as_str().expect("task id").parse()?)
}
