use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{decode_token, Claims, TokenKind};
use crate::error::ApiError;

/// Authenticated caller identity extracted from the bearer token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub is_superuser: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            is_superuser: claims.superuser,
        }
    }
}

/// Resolve the caller identity from the Authorization header.
///
/// All failure modes are authentication failures (401). The messages differ
/// so a client log makes clear which stage rejected the request, but no
/// other behavior hangs off the distinction.
pub fn resolve_identity(headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthorized("Authorization header is expected."))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Token not found in Authorization header."))?;

    // Second whitespace-separated segment is the token ("Bearer <token>").
    let token = auth_str
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| ApiError::unauthorized("Token not found in Authorization header."))?;

    let claims = decode_token(token).map_err(|reason| {
        tracing::debug!("bearer token rejected: {}", reason);
        ApiError::unauthorized("Invalid or expired token.")
    })?;

    // Refresh tokens are not valid for API access.
    if claims.kind != TokenKind::Access {
        tracing::debug!("bearer token rejected: not an access token");
        return Err(ApiError::unauthorized("Invalid or expired token."));
    }

    Ok(AuthUser::from(claims))
}

/// Bearer-token middleware guarding the protected routes. Injects the
/// resolved [`AuthUser`] as a request extension for handlers to consume.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = resolve_identity(&headers)?;
    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}
