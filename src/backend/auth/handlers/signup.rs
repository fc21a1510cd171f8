/**
 * Signup Handler
 *
 * This module implements the user registration handler for POST /api/auth/signup.
 *
 * # Registration Process
 *
 * 1. Validate username, email, first name and password
 * 2. Check that username and email are free
 * 3. Hash password using bcrypt
 * 4. Create user in database (status `offline`)
 * 5. Generate a bearer token and return it with the profile (201 Created)
 */

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::{AuthResponse, SignupRequest, UserResponse};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{create_user, get_user_by_email, get_user_by_username};
use crate::backend::error::{ApiResponse, BackendError};
use crate::shared::AppConfig;

/// Validate username format
///
/// Usernames must be 3-30 characters long, start with a letter, and contain
/// only alphanumeric characters and underscores.
pub fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Sign up handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid username, email, name or short password
/// * `409 Conflict` - username or email already registered, including a
///   concurrent signup that won the race to the insert
/// * `500 Internal Server Error` - hashing, storage or token failure
///
/// # Example Request
///
/// ```http
/// POST /api/auth/signup HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "email": "alice@example.com",
///   "password": "securepassword123",
///   "firstName": "Alice"
/// }
/// ```
pub async fn signup(
    State(pool): State<SqlitePool>,
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, ApiResponse<AuthResponse>), BackendError> {
    tracing::info!("[Auth] Signup request for username: {}", request.username);

    if !is_valid_username(&request.username) {
        return Err(BackendError::invalid_input(
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        ));
    }

    let email = request.email.trim();
    if !email.contains('@') {
        return Err(BackendError::invalid_input("Invalid email format"));
    }

    let first_name = request.first_name.trim();
    if first_name.is_empty() {
        return Err(BackendError::invalid_input("First name cannot be empty"));
    }

    if request.password.len() < 8 {
        return Err(BackendError::invalid_input("Password must be at least 8 characters"));
    }

    if get_user_by_username(&pool, &request.username).await?.is_some() {
        return Err(BackendError::conflict("Username already taken"));
    }

    if get_user_by_email(&pool, email).await?.is_some() {
        return Err(BackendError::conflict("Email already registered"));
    }

    let password_hash = bcrypt::hash(&request.password, config.bcrypt_cost)?;

    let last_name = request
        .last_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    let user = create_user(&pool, &request.username, email, first_name, last_name, &password_hash)
        .await
        .map_err(|e| BackendError::from_write(e, "Username or email already registered"))?;

    let token = create_token(&config, user.id, &user.email, &user.username)?;

    tracing::info!("[Auth] User created successfully: {} ({})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        ApiResponse::new(AuthResponse {
            token,
            user: UserResponse::from(user),
        }),
    ))
}
