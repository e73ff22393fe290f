use axum::{extract::State, response::Json};
use serde::Deserialize;

use crate::auth::{issue_token_pair, verify_password, TokenPair};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /login/ - Verify username/password and issue an access/refresh pair.
///
/// Both "missing fields" and "bad credentials" are 400s; the messages are
/// part of the API contract.
pub async fn login(
    State(state): State<AppState>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Json<TokenPair>, ApiError> {
    let Some(Json(payload)) = payload else {
        return Err(ApiError::bad_request(
            "Please provide both username and password.",
        ));
    };

    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        return Err(ApiError::bad_request(
            "Please provide both username and password.",
        ));
    };

    let user = state
        .store
        .user_by_username(&username)
        .await?
        .filter(|u| verify_password(&password, &u.password_hash))
        .ok_or_else(|| ApiError::bad_request("Invalid credentials"))?;

    tracing::debug!("issuing token pair for user {}", user.id);
    let pair = issue_token_pair(&user)?;
    Ok(Json(pair))
}
