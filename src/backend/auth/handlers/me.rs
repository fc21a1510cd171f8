/**
 * Current User Handlers
 *
 * - `GET /api/auth/me` - profile of the user behind the bearer token
 * - `PUT /api/users/me` - edit that profile
 *
 * Both routes sit behind `auth_middleware`. Username, status and the follow
 * graph are not editable here.
 */

use std::sync::Arc;

use axum::{extract::State, response::Json};
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::{UpdateProfileRequest, UserResponse};
use crate::backend::auth::users::{get_user_by_email, get_user_by_id, update_profile, ProfileUpdate};
use crate::backend::error::{ApiResponse, BackendError};
use crate::backend::middleware::AuthUser;
use crate::shared::AppConfig;

/// Get current user handler
///
/// # Errors
///
/// * `401 Unauthorized` - missing or invalid token
/// * `404 Not Found` - the user was removed after the token was issued
pub async fn get_me(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
) -> Result<ApiResponse<UserResponse>, BackendError> {
    let user = get_user_by_id(&pool, auth.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    Ok(ApiResponse::new(UserResponse::from(user)))
}

/// Edit the caller's own profile
///
/// # Errors
///
/// * `400 Bad Request` - blank first name, malformed email or short password
/// * `404 Not Found` - the user was removed after the token was issued
/// * `409 Conflict` - email belongs to another account
pub async fn update_me(
    State(pool): State<SqlitePool>,
    State(config): State<Arc<AppConfig>>,
    AuthUser(auth): AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<ApiResponse<UserResponse>, BackendError> {
    let first_name = request.first_name.as_deref().map(str::trim);
    if first_name.is_some_and(str::is_empty) {
        return Err(BackendError::invalid_input("First name cannot be empty"));
    }

    let email = request.email.as_deref().map(str::trim);
    if let Some(email) = email {
        if !email.contains('@') {
            return Err(BackendError::invalid_input("Invalid email format"));
        }
        if let Some(owner) = get_user_by_email(&pool, email).await? {
            if owner.id != auth.user_id {
                return Err(BackendError::conflict("Email already registered"));
            }
        }
    }

    let password_hash = match request.password.as_deref() {
        Some(password) if password.len() < 8 => {
            return Err(BackendError::invalid_input("Password must be at least 8 characters"));
        }
        Some(password) => Some(bcrypt::hash(password, config.bcrypt_cost)?),
        None => None,
    };

    let update = ProfileUpdate {
        first_name,
        last_name: request
            .last_name
            .as_deref()
            .map(|name| Some(name.trim()).filter(|name| !name.is_empty())),
        email,
        password_hash: password_hash.as_deref(),
    };

    let user = update_profile(&pool, auth.user_id, &update)
        .await
        .map_err(|e| BackendError::from_write(e, "Email already registered"))?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    tracing::info!("[Auth] Profile updated for {}", user.username);

    Ok(ApiResponse::new(UserResponse::from(user)))
}
