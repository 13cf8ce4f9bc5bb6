use serde::Serialize;
use sqlx::FromRow;

/// Seeded credential record. Read-only after initialization.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Never serialized into responses
    #[serde(skip_serializing)]
    pub password_hash: String,
}
