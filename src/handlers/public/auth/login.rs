use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::database::manager::StoreManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AuthService;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/login - Authenticate user credentials and receive a JWT token
///
/// Expected input:
/// ```json
/// { "username": "admin", "password": "admin123" }
/// ```
///
/// Expected output (success):
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiI...",
///   "user": { "username": "admin", "email": "admin@enterprise.com" },
///   "expires_in": 604800
/// }
/// ```
///
/// Invalid credentials return 401. The rejection message does not reveal
/// whether the username or the password was wrong.
pub async fn login_post(Json(payload): Json<LoginRequest>) -> ApiResult<Value> {
    let pool = StoreManager::pool().await?;
    let auth_service = AuthService::new(pool);

    let user = auth_service
        .validate_user(&payload.username, &payload.password)
        .await?
        .ok_or_else(|| {
            tracing::warn!(username = %payload.username, "login rejected");
            ApiError::unauthorized("invalid username or password")
        })?;

    let claims = Claims::new(user.username.clone(), user.email.clone());
    let token = generate_jwt(&claims).map_err(|e| {
        tracing::error!("JWT generation failed: {}", e);
        ApiError::internal_server_error("failed to issue token")
    })?;

    tracing::info!(username = %user.username, "login succeeded");

    Ok(ApiResponse::success(json!({
        "token": token,
        "user": {
            "username": user.username,
            "email": user.email,
        },
        "expires_in": claims.expires_in(),
    })))
}
