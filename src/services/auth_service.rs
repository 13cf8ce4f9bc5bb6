use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

use crate::database::manager::StoreError;
use crate::database::models::User;

/// Hash a plaintext password to its stored digest form.
///
/// Unsalted single-pass SHA-256, hex encoded. This is a known-weak scheme
/// kept only for behavioral parity with the seeded credential records; new
/// systems should use a salted, iterated KDF instead.
///
/// Validation compares stored hashes by exact string equality, so any
/// externally provisioned store must use this same lowercase-hex encoding;
/// digests in another representation (e.g. Base64) will never match.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Credential validator over the seeded user store
pub struct AuthService {
    pool: SqlitePool,
}

impl AuthService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Validate a username/password pair against the seeded records.
    ///
    /// Returns the matching record, or `None` when no record has exactly
    /// that username and a hash equal to the hashed attempt. Both matches
    /// are case-sensitive. Absence is a normal outcome, not an error.
    pub async fn validate_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, StoreError> {
        let password_hash = hash_password(password);

        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash FROM users
             WHERE username = ? AND password_hash = ?",
        )
        .bind(username)
        .bind(&password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
