use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Provisioned account. There is no registration endpoint; rows are created
/// out of band (fixtures in dev, seeded directly in tests).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// SHA-256 hex digest of the password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_superuser: bool,
}
