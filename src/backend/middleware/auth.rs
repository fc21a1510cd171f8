/**
 * Authentication Middleware
 *
 * This module protects routes that require a signed-in user. It extracts
 * and verifies the bearer token, checks that the user still exists, and
 * hands the identity to handlers through request extensions.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::sessions::get_user_id_from_token;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user data extracted from the bearer token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve a token to a user that still exists
pub async fn authenticate(app_state: &AppState, token: &str) -> Result<AuthenticatedUser, BackendError> {
    let user_id = get_user_id_from_token(&app_state.config, token)?;

    let user = get_user_by_id(&app_state.db_pool, user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("[Auth] Token for unknown user {}", user_id);
            BackendError::unauthenticated("User no longer exists")
        })?;

    Ok(AuthenticatedUser {
        user_id,
        username: user.username,
        email: user.email,
    })
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the bearer token from the Authorization header
/// 2. Verifies the token and resolves the user
/// 3. Attaches the user to request extensions for handlers
///
/// Returns 401 Unauthorized if the token is missing or invalid
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        tracing::warn!("[Auth] Missing or malformed Authorization header");
        BackendError::unauthenticated("Missing bearer token")
    })?;

    let user = authenticate(&app_state, token).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Only valid on routes behind `auth_middleware`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("[Auth] AuthenticatedUser not found in request extensions");
                BackendError::unauthenticated("Authentication required")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_extract_authenticated_user() {
        let mut request = Request::builder().uri("http://example.com").body(()).unwrap();
        let user = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            username: "tester".to_string(),
            email: "test@example.com".to_string(),
        };
        request.extensions_mut().insert(user.clone());

        let (mut parts, _) = request.into_parts();
        let AuthUser(extracted) = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted.user_id, user.user_id);
    }

    #[tokio::test]
    async fn test_extract_authenticated_user_missing() {
        let request = Request::builder().uri("http://example.com").body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        match AuthUser::from_request_parts(&mut parts, &()).await {
            Err(BackendError::Unauthenticated { .. }) => {}
            other => panic!("Expected Unauthenticated, got {:?}", other.map(|u| u.0)),
        }
    }
}
