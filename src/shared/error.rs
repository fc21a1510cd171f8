//! Shared Error Types
//!
//! This module defines error types raised while parsing or validating wire
//! data. They are independent of the transport and are converted into
//! `BackendError` at the HTTP and realtime boundaries.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `UnknownStatus` - A status string that is neither `online` nor `offline`
//!
//! # Usage
//!
//! ```rust
//! use socialhub::shared::error::SharedError;
//!
//! let error = SharedError::unknown_status("away");
//! ```
use thiserror::Error;

/// Shared error types that can occur on either surface
#[derive(Debug, Error, Clone)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Unrecognised presence status
    #[error("Unknown status '{value}'")]
    UnknownStatus {
        /// The rejected value
        value: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new unknown-status error
    pub fn unknown_status(value: impl Into<String>) -> Self {
        Self::UnknownStatus {
            value: value.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_display() {
        let error = SharedError::unknown_status("away");
        assert_eq!(error.to_string(), "Unknown status 'away'");
    }

    #[test]
    fn test_from_serde_error() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("{ invalid json }");
        let shared_error: SharedError = result.unwrap_err().into();

        match shared_error {
            SharedError::SerializationError { message } => {
                assert!(message.starts_with("JSON error"));
            }
            _ => panic!("Expected SerializationError from serde error"),
        }
    }
}
