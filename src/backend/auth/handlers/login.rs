/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/auth/login.
 *
 * # Security
 *
 * - Passwords are verified using bcrypt
 * - Unknown users and wrong passwords produce the same 400 response
 * - Passwords are never logged or returned in responses
 */
use std::sync::Arc;

use axum::{extract::State, response::Json};
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{get_user_by_email, get_user_by_username};
use crate::backend::error::{ApiResponse, BackendError};
use crate::shared::AppConfig;

/// Login handler
///
/// Looks the user up by username, or by email when the identifier contains
/// '@', verifies the password and returns a fresh bearer token.
///
/// # Errors
///
/// * `400 Bad Request` - unknown user or wrong password
/// * `500 Internal Server Error` - storage, hashing or token failure
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<ApiResponse<AuthResponse>, BackendError> {
    tracing::info!("[Auth] Login request for: {}", request.username);

    let user = if request.username.contains('@') {
        get_user_by_email(&pool, request.username.trim()).await?
    } else {
        get_user_by_username(&pool, request.username.trim()).await?
    };

    let user = user.ok_or_else(|| {
        tracing::warn!("[Auth] User not found: {}", request.username);
        BackendError::bad_credentials("Invalid username or password")
    })?;

    if !bcrypt::verify(&request.password, &user.password_hash)? {
        tracing::warn!("[Auth] Invalid password for user: {}", request.username);
        return Err(BackendError::bad_credentials("Invalid username or password"));
    }

    let token = create_token(&config, user.id, &user.email, &user.username)?;

    tracing::info!("[Auth] User logged in successfully: {}", user.username);

    Ok(ApiResponse::new(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}
