/**
 * Session Tokens
 *
 * This module issues and verifies the HS256 bearer tokens used by the HTTP
 * API and the realtime channel. The signing secret and lifetime come from
 * `AppConfig`.
 */

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::shared::AppConfig;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Username
    #[serde(default)]
    pub username: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Create a JWT token for a user
///
/// # Arguments
/// * `config` - Provides the signing secret and token lifetime
/// * `user_id` - User ID (UUID)
/// * `email` - User email
/// * `username` - Username, embedded for clients
///
/// # Returns
/// JWT token string
pub fn create_token(
    config: &AppConfig,
    user_id: Uuid,
    email: &str,
    username: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp().max(0) as u64;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        username: Some(username.to_string()),
        exp: now + config.token_ttl_secs,
        iat: now,
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
pub fn verify_token(config: &AppConfig, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let token_data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(token_data.claims)
}

/// Extract user ID from token
///
/// # Errors
/// `Unauthenticated` if the token is invalid, expired or carries a
/// malformed subject.
pub fn get_user_id_from_token(config: &AppConfig, token: &str) -> Result<Uuid, BackendError> {
    let claims = verify_token(config, token).map_err(|e| {
        tracing::warn!("[Auth] Token verification failed: {}", e);
        BackendError::unauthenticated("Invalid or expired token")
    })?;
    Uuid::parse_str(&claims.sub)
        .map_err(|_| BackendError::unauthenticated("Invalid user ID in token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig::builder().jwt_secret("test-secret").build().unwrap()
    }

    #[test]
    fn test_verify_token() {
        let config = config();
        let user_id = Uuid::new_v4();
        let token = create_token(&config, user_id, "test@example.com", "tester").unwrap();

        let claims = verify_token(&config, &token).unwrap();
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username.as_deref(), Some("tester"));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_get_user_id_from_token() {
        let config = config();
        let user_id = Uuid::new_v4();
        let token = create_token(&config, user_id, "test@example.com", "tester").unwrap();

        assert_eq!(get_user_id_from_token(&config, &token).unwrap(), user_id);
    }

    #[test]
    fn test_verify_invalid_token() {
        let result = get_user_id_from_token(&config(), "invalid.token.here");
        match result {
            Err(BackendError::Unauthenticated { .. }) => {}
            other => panic!("Expected Unauthenticated, got {:?}", other),
        }
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let other = AppConfig::builder().jwt_secret("other-secret").build().unwrap();
        let token = create_token(&other, Uuid::new_v4(), "a@b.c", "abc").unwrap();
        assert!(verify_token(&config(), &token).is_err());
    }
}
