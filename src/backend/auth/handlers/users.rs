/**
 * User Profile and Follow Handlers
 *
 * - `GET /api/users/{id}` - public profile with following/followers
 * - `GET /api/users/search?query=&limit=&page=` - find users by name
 * - `POST /api/users/{id}/follow` - follow a user
 * - `DELETE /api/users/{id}/follow` - unfollow a user
 *
 * All routes sit behind `auth_middleware`; the follower is always the
 * authenticated caller.
 */

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users::{self, get_summary};
use crate::backend::error::{ApiResponse, BackendError, PagedResponse, Pagination};
use crate::backend::middleware::AuthUser;
use crate::shared::UserSummary;

const DEFAULT_SEARCH_LIMIT: i64 = 10;
const MAX_SEARCH_LIMIT: i64 = 100;
const MIN_SEARCH_QUERY_CHARS: usize = 2;

/// Query string of GET /api/users/search
///
/// `limit` and `page` stay strings so that junk values fall back to the
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

/// Public profile with both sides of the follow graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user: UserSummary,
    pub following: Vec<UserSummary>,
    pub followers: Vec<UserSummary>,
}

/// Result of a follow or unfollow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowResponse {
    /// Whether the graph changed (false for a repeated follow)
    pub changed: bool,
    pub following: Vec<UserSummary>,
}

/// Get a user's public profile
pub async fn get_user(
    State(pool): State<SqlitePool>,
    Path(user_id): Path<Uuid>,
) -> Result<ApiResponse<UserProfile>, BackendError> {
    let user = get_summary(&pool, user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    let following = users::get_following(&pool, user_id).await?;
    let followers = users::get_followers(&pool, user_id).await?;

    Ok(ApiResponse::new(UserProfile {
        user,
        following,
        followers,
    }))
}

/// Search users by username or first name
///
/// Matches are case-insensitive substrings, ordered by username.
///
/// # Errors
///
/// * `400 Bad Request` - query missing or shorter than 2 characters
pub async fn search_users(
    State(pool): State<SqlitePool>,
    Query(params): Query<SearchQuery>,
) -> Result<PagedResponse<UserSummary>, BackendError> {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .ok_or_else(|| BackendError::invalid_input("Search query is required"))?;
    if query.chars().count() < MIN_SEARCH_QUERY_CHARS {
        return Err(BackendError::invalid_input(
            "Search query must be at least 2 characters long",
        ));
    }

    let limit = search_limit(params.limit.as_deref());
    let page = search_page(params.page.as_deref());

    let (found, total) = users::search_users(&pool, query, limit, (page - 1) * limit).await?;
    tracing::debug!("[Users] Search '{}' page {} matched {} users", query, page, total);

    Ok(PagedResponse::new(found, Pagination::new(total, page, limit)))
}

fn search_limit(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|limit| (1..=MAX_SEARCH_LIMIT).contains(limit))
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
}

fn search_page(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

/// Follow a user
///
/// # Errors
///
/// * `400 Bad Request` - following yourself
/// * `404 Not Found` - unknown target
pub async fn follow_user(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Path(target_id): Path<Uuid>,
) -> Result<ApiResponse<FollowResponse>, BackendError> {
    if target_id == auth.user_id {
        return Err(BackendError::invalid_input("You cannot follow yourself"));
    }

    if get_summary(&pool, target_id).await?.is_none() {
        return Err(BackendError::not_found("User not found"));
    }

    let changed = users::follow(&pool, auth.user_id, target_id).await?;
    tracing::info!("[Users] {} follows {} (new edge: {})", auth.user_id, target_id, changed);

    Ok(ApiResponse::new(FollowResponse {
        changed,
        following: users::get_following(&pool, auth.user_id).await?,
    }))
}

/// Unfollow a user
///
/// Unfollowing someone you do not follow is a no-op, not an error.
pub async fn unfollow_user(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Path(target_id): Path<Uuid>,
) -> Result<ApiResponse<FollowResponse>, BackendError> {
    let changed = users::unfollow(&pool, auth.user_id, target_id).await?;
    tracing::info!("[Users] {} unfollows {} (edge removed: {})", auth.user_id, target_id, changed);

    Ok(ApiResponse::new(FollowResponse {
        changed,
        following: users::get_following(&pool, auth.user_id).await?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_limit_falls_back_to_default() {
        assert_eq!(search_limit(None), 10);
        assert_eq!(search_limit(Some("25")), 25);
        assert_eq!(search_limit(Some("0")), 10);
        assert_eq!(search_limit(Some("101")), 10);
        assert_eq!(search_limit(Some("lots")), 10);
    }

    #[test]
    fn test_search_page_falls_back_to_first() {
        assert_eq!(search_page(None), 1);
        assert_eq!(search_page(Some("3")), 3);
        assert_eq!(search_page(Some("-2")), 1);
        assert_eq!(search_page(Some("x")), 1);
    }
}
