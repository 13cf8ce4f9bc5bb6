use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config;
use crate::services::auth_service::hash_password;

/// Errors from the credential store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid database URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Users seeded once at startup, only when the store is empty
const SEED_USERS: &[(&str, &str, &str)] = &[
    ("admin", "admin@enterprise.com", "admin123"),
    ("usuario1", "usuario1@enterprise.com", "user123"),
    ("usuario2", "usuario2@enterprise.com", "user456"),
];

/// Connection pool manager for the seeded credential store
pub struct StoreManager;

impl StoreManager {
    /// Get the shared store pool, creating and seeding it on first use
    pub async fn pool() -> Result<SqlitePool, StoreError> {
        use tokio::sync::OnceCell;
        static POOL: OnceCell<SqlitePool> = OnceCell::const_new();

        POOL.get_or_try_init(|| async {
            let db_config = &config::config().database;

            let options = SqliteConnectOptions::from_str(&db_config.url)
                .map_err(|_| StoreError::InvalidUrl(db_config.url.clone()))?
                .create_if_missing(true);

            let pool = Self::pool_options(&db_config.url, db_config.max_connections)
                .connect_with(options)
                .await?;

            Self::initialize(&pool).await?;
            Ok(pool)
        })
        .await
        .cloned()
    }

    /// Pool sizing and recycling policy for a store URL.
    ///
    /// Every connection to :memory: opens a fresh empty database, so the
    /// in-memory store must hold exactly one connection for the lifetime of
    /// the process: pinned to a single slot, kept open, and never reaped by
    /// the pool's idle or lifetime reclamation. A replacement connection
    /// would come up without the seeded users table.
    fn pool_options(url: &str, max_connections: u32) -> SqlitePoolOptions {
        if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        }
    }

    /// Create the users table and seed the fixed credential records.
    /// Idempotent: an already-populated store is left untouched.
    pub async fn initialize(pool: &SqlitePool) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL,
                password_hash TEXT NOT NULL
            )",
        )
        .execute(pool)
        .await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        if count > 0 {
            return Ok(());
        }

        for (username, email, password) in SEED_USERS {
            sqlx::query("INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?)")
                .bind(username)
                .bind(email)
                .bind(hash_password(password))
                .execute(pool)
                .await?;
        }

        info!("seeded {} credential records", SEED_USERS.len());
        Ok(())
    }

    /// Liveness probe against the store
    pub async fn health_check() -> Result<(), StoreError> {
        let pool = Self::pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_pool() -> SqlitePool {
        StoreManager::pool_options("sqlite::memory:", 5)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite")
    }

    #[tokio::test]
    async fn initialize_seeds_three_users() {
        let pool = memory_pool().await;
        StoreManager::initialize(&pool).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let pool = memory_pool().await;
        StoreManager::initialize(&pool).await.unwrap();
        StoreManager::initialize(&pool).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn memory_pool_policy_never_recycles_its_connection() {
        let options = StoreManager::pool_options("sqlite::memory:", 5);

        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_min_connections(), 1);
        assert_eq!(options.get_idle_timeout(), None);
        assert_eq!(options.get_max_lifetime(), None);

        // File-backed stores keep the configured pool size
        let options = StoreManager::pool_options("sqlite:product_api.db", 5);
        assert_eq!(options.get_max_connections(), 5);
    }

    #[tokio::test]
    async fn seed_survives_idle_between_acquires() {
        let pool = memory_pool().await;
        StoreManager::initialize(&pool).await.unwrap();

        // Leave the single connection idle in the pool, then come back for
        // it. With an idle timeout in play the pool would hand back a fresh
        // connection whose database has no users table at all.
        tokio::time::sleep(Duration::from_millis(500)).await;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn seeded_hash_matches_hash_of_known_password() {
        let pool = memory_pool().await;
        StoreManager::initialize(&pool).await.unwrap();

        let stored: String =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE username = 'admin'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(stored, hash_password("admin123"));
    }
}
