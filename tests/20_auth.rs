mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn missing_authorization_header() -> Result<()> {
    let app = common::seeded_app();

    let (status, body) = common::request(&app, Method::GET, "/projects/", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authorization header is expected.");
    Ok(())
}

#[tokio::test]
async fn header_without_token_segment() -> Result<()> {
    let app = common::seeded_app();

    let (status, body) =
        common::request(&app, Method::GET, "/projects/", Some(""), None).await?;
    // common::request sends "Bearer <token>", so an empty token leaves just
    // the scheme with no second segment.
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token not found in Authorization header.");
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_unauthorized() -> Result<()> {
    let app = common::seeded_app();

    let (status, body) =
        common::request(&app, Method::GET, "/tasks/", Some("not-a-jwt"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token.");
    Ok(())
}

#[tokio::test]
async fn refresh_token_cannot_access_api() -> Result<()> {
    let app = common::seeded_app();

    let (status, body) = common::request(
        &app,
        Method::POST,
        "/login/",
        None,
        Some(json!({ "username": "alice", "password": "alice-pw" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let refresh = body["refresh"].as_str().unwrap().to_string();

    let (status, body) =
        common::request(&app, Method::GET, "/projects/", Some(&refresh), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token.");
    Ok(())
}

#[tokio::test]
async fn all_protected_routes_require_auth() -> Result<()> {
    let app = common::seeded_app();

    let id = uuid::Uuid::new_v4();
    let routes = [
        (Method::GET, "/projects/".to_string()),
        (Method::POST, "/projects/".to_string()),
        (Method::GET, format!("/projects/{}/", id)),
        (Method::PUT, format!("/projects/{}/", id)),
        (Method::DELETE, format!("/projects/{}/", id)),
        (Method::GET, "/tasks/".to_string()),
        (Method::POST, "/tasks/".to_string()),
        (Method::GET, format!("/tasks/{}/", id)),
        (Method::PUT, format!("/tasks/{}/", id)),
        (Method::DELETE, format!("/tasks/{}/", id)),
    ];

    for (method, uri) in routes {
        let (status, _) = common::request(&app, method.clone(), &uri, None, None).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }
    Ok(())
}
