/**
 * Backend Error Types
 *
 * This module defines the error type returned by every store operation and
 * HTTP handler. The same type is converted into an `error` frame on the
 * realtime channel.
 *
 * # Error Categories
 *
 * ## Domain Errors
 *
 * - `InvalidInput` - malformed or empty input (400)
 * - `NotFound` - unknown user, room, invite token or member (404)
 * - `Forbidden` - requester lacks creator or member rights (403)
 * - `BadCredentials` - wrong or missing password (400)
 * - `Unauthenticated` - missing or invalid bearer token (401)
 * - `Conflict` - username or email already registered (409)
 * - `Internal` - unexpected server-side failure (500)
 *
 * ## Wrapped Errors
 *
 * Store, hashing, token and serialization errors are wrapped with `#[from]`
 * so operations can propagate them with `?`. Their details are logged but
 * never sent to clients.
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use socialhub::backend::error::BackendError;
///
/// let err = BackendError::not_found("Room not found");
/// assert_eq!(err.status_code().as_u16(), 404);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Malformed or empty input
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Human-readable error message
        message: String,
    },

    /// Referenced entity does not exist
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// Requester is not allowed to perform the operation
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Human-readable error message
        message: String,
    },

    /// Wrong or missing password
    #[error("Bad credentials: {message}")]
    BadCredentials {
        /// Human-readable error message
        message: String,
    },

    /// Missing or invalid bearer token
    #[error("Unauthenticated: {message}")]
    Unauthenticated {
        /// Human-readable error message
        message: String,
    },

    /// Unique identity already taken
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable error message
        message: String,
    },

    /// Unexpected server-side failure
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message
        message: String,
    },

    /// Shared error (parsing of wire data)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Store failure
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Password hashing failure
    #[error("Password hashing error: {0}")]
    HashError(#[from] bcrypt::BcryptError),

    /// Token encoding or decoding failure
    #[error("Token error: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a new bad-credentials error
    pub fn bad_credentials(message: impl Into<String>) -> Self {
        Self::BadCredentials {
            message: message.into(),
        }
    }

    /// Create a new unauthenticated error
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// Create a new conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Wrap a failed write, reporting a UNIQUE violation as `Conflict`
    pub fn from_write(err: sqlx::Error, conflict_message: impl Into<String>) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                tracing::warn!("[Error] Unique violation: {}", db_err);
                Self::conflict(conflict_message)
            }
            _ => Self::DatabaseError(err),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `InvalidInput`, `BadCredentials` - 400 Bad Request
    /// - `Unauthenticated`, `TokenError` - 401 Unauthorized
    /// - `Forbidden` - 403 Forbidden
    /// - `NotFound` - 404 Not Found
    /// - `Conflict` - 409 Conflict
    /// - `SharedError` - 400 for an unknown status, 500 for serialization
    /// - everything else - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::BadCredentials { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                SharedError::UnknownStatus { .. } => StatusCode::BAD_REQUEST,
            },
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::HashError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::TokenError(_) => StatusCode::UNAUTHORIZED,
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing error message
    ///
    /// Wrapped infrastructure errors are reduced to a generic message.
    pub fn message(&self) -> String {
        match self {
            Self::InvalidInput { message }
            | Self::NotFound { message }
            | Self::Forbidden { message }
            | Self::BadCredentials { message }
            | Self::Unauthenticated { message }
            | Self::Conflict { message }
            | Self::Internal { message } => message.clone(),
            Self::SharedError(err) => err.to_string(),
            Self::DatabaseError(_) | Self::HashError(_) => "Internal server error".to_string(),
            Self::TokenError(_) => "Invalid or expired token".to_string(),
            Self::SerializationError(err) => err.to_string(),
        }
    }
}
