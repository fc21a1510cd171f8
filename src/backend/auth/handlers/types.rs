/**
 * Authentication Handler Types
 *
 * Request and response bodies shared by the signup, login and profile
 * handlers.
 */

use serde::{Deserialize, Serialize};

use crate::backend::auth::users::User;
use crate::shared::UserStatus;

/// Sign up request
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// User's chosen username (3-30 chars, alphanumeric + underscore)
    pub username: String,
    /// User's email address
    pub email: String,
    /// User's password (will be hashed before storage)
    pub password: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    /// Username, or email when it contains '@'
    pub username: String,
    pub password: String,
}

/// Profile edit request for PUT /api/users/me
///
/// Absent fields are left unchanged; an empty `lastName` clears it.
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Auth response
///
/// Returned by signup and login. Contains the bearer token and the
/// user's own profile.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// The caller's own profile (includes email, never the password hash)
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub status: UserStatus,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            status: user.status,
        }
    }
}
