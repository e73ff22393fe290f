use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config;
use crate::models::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub superuser: bool,
    pub kind: TokenKind,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user: &User, kind: TokenKind) -> Self {
        let now = Utc::now();
        let security = &config::config().security;
        let lifetime = match kind {
            TokenKind::Access => Duration::minutes(security.access_token_expiry_mins as i64),
            TokenKind::Refresh => Duration::days(security.refresh_token_expiry_days as i64),
        };

        Self {
            sub: user.id,
            username: user.username.clone(),
            superuser: user.is_superuser,
            kind,
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Access/refresh pair returned by a successful login.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug)]
pub enum TokenError {
    Generation(String),
    InvalidSecret,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Generation(msg) => write!(f, "JWT generation error: {}", msg),
            TokenError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for TokenError {}

pub fn generate_token(claims: Claims) -> Result<String, TokenError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(TokenError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, &claims, &encoding_key).map_err(|e| TokenError::Generation(e.to_string()))
}

/// Issue the access/refresh pair for a freshly authenticated user.
pub fn issue_token_pair(user: &User) -> Result<TokenPair, TokenError> {
    Ok(TokenPair {
        access: generate_token(Claims::new(user, TokenKind::Access))?,
        refresh: generate_token(Claims::new(user, TokenKind::Refresh))?,
    })
}

/// Validate a bearer token and extract its claims. Signature, expiry, and
/// secret problems all collapse into a single diagnostic string; callers
/// map it to an authentication failure.
pub fn decode_token(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}

/// SHA-256 hex digest used for stored passwords.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    format!("{:x}", digest)
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    hash_password(password) == password_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            password_hash: hash_password("hunter2"),
            is_superuser: false,
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let user = test_user();
        assert!(verify_password("hunter2", &user.password_hash));
        assert!(!verify_password("hunter3", &user.password_hash));
    }

    #[test]
    fn issued_access_token_decodes_to_same_identity() {
        let user = test_user();
        let pair = issue_token_pair(&user).unwrap();
        assert!(!pair.access.is_empty());
        assert!(!pair.refresh.is_empty());

        let claims = decode_token(&pair.access).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.kind, TokenKind::Access);

        let refresh = decode_token(&pair.refresh).unwrap();
        assert_eq!(refresh.kind, TokenKind::Refresh);
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(decode_token("not-a-jwt").is_err());
    }
}
