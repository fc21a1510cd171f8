/**
 * User Directory
 *
 * This module owns user records, the presence flag stored on each user and
 * the follow graph.
 *
 * # Follow Graph
 *
 * `followers` and `following` are both derived from the single `follows`
 * edge set, so the two views can never disagree. Edges are weak references:
 * deleting a user leaves dangling ids behind, and reads simply skip them
 * because they join against `users`.
 *
 * Follow writes are single `INSERT OR IGNORE` statements on the composite
 * primary key, which makes a repeated or concurrent follow a no-op.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::shared::{UserStatus, UserSummary};

/// User struct representing a user in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Username (unique, 3-30 chars, alphanumeric + underscore)
    pub username: String,
    /// User email address (unique)
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    /// Hashed password (bcrypt)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Presence flag, `offline` until the first announce
    #[sqlx(try_from = "String")]
    pub status: UserStatus,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public projection of this user
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            status: self.status,
        }
    }
}

/// Create a new user
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `username` - User's chosen username
/// * `email` - User email
/// * `first_name` / `last_name` - Display name
/// * `password_hash` - Hashed password
///
/// # Returns
/// Created user (status `offline`) or error
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    first_name: &str,
    last_name: Option<&str>,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, email, first_name, last_name, password_hash, status, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        RETURNING id, username, email, first_name, last_name, password_hash, status, created_at, updated_at
        "#
    )
    .bind(id)
    .bind(username)
    .bind(email)
    .bind(first_name)
    .bind(last_name)
    .bind(password_hash)
    .bind(UserStatus::Offline.as_str())
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get user by ID
///
/// # Returns
/// User or None if not found
pub async fn get_user_by_id(
    pool: &SqlitePool,
    id: Uuid,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, first_name, last_name, password_hash, status, created_at, updated_at
        FROM users
        WHERE id = ?1
        "#
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get user by email
pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, first_name, last_name, password_hash, status, created_at, updated_at
        FROM users
        WHERE email = ?1
        "#
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get user by username
pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, first_name, last_name, password_hash, status, created_at, updated_at
        FROM users
        WHERE username = ?1
        "#
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Public summary of a user, if it exists
pub async fn get_summary(
    pool: &SqlitePool,
    id: Uuid,
) -> Result<Option<UserSummary>, sqlx::Error> {
    Ok(get_user_by_id(pool, id).await?.map(|user| user.summary()))
}

/// Set the presence flag of a user
///
/// # Returns
/// Updated user, or None if no user has this id
pub async fn set_status(
    pool: &SqlitePool,
    id: Uuid,
    status: UserStatus,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET status = ?1, updated_at = ?2
        WHERE id = ?3
        RETURNING id, username, email, first_name, last_name, password_hash, status, created_at, updated_at
        "#
    )
    .bind(status.as_str())
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Fields of a profile edit; `None` leaves a column unchanged
///
/// `last_name: Some(None)` clears the last name.
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<Option<&'a str>>,
    pub email: Option<&'a str>,
    pub password_hash: Option<&'a str>,
}

/// Apply a profile edit
///
/// # Returns
/// Updated user, or None if no user has this id
pub async fn update_profile(
    pool: &SqlitePool,
    id: Uuid,
    update: &ProfileUpdate<'_>,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET first_name = COALESCE(?1, first_name),
            last_name = CASE WHEN ?2 THEN ?3 ELSE last_name END,
            email = COALESCE(?4, email),
            password_hash = COALESCE(?5, password_hash),
            updated_at = ?6
        WHERE id = ?7
        RETURNING id, username, email, first_name, last_name, password_hash, status, created_at, updated_at
        "#
    )
    .bind(update.first_name)
    .bind(update.last_name.is_some())
    .bind(update.last_name.flatten())
    .bind(update.email)
    .bind(update.password_hash)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Users whose username or first name contains `query`, ignoring case
///
/// # Returns
/// One page of matches ordered by username, and the total match count
pub async fn search_users(
    pool: &SqlitePool,
    query: &str,
    limit: i64,
    offset: i64,
) -> Result<(Vec<UserSummary>, i64), sqlx::Error> {
    let pattern = format!("%{}%", escape_like(query));

    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, first_name, last_name, password_hash, status, created_at, updated_at
        FROM users
        WHERE username LIKE ?1 ESCAPE '\' OR first_name LIKE ?1 ESCAPE '\'
        ORDER BY username
        LIMIT ?2 OFFSET ?3
        "#
    )
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM users
        WHERE username LIKE ?1 ESCAPE '\' OR first_name LIKE ?1 ESCAPE '\'
        "#
    )
    .bind(&pattern)
    .fetch_one(pool)
    .await?;

    Ok((users.iter().map(User::summary).collect(), total))
}

/// Escape `LIKE` wildcards so the query matches literally
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Add the edge `follower -> followee`
///
/// # Returns
/// `true` if the edge was created, `false` if it already existed
pub async fn follow(
    pool: &SqlitePool,
    follower_id: Uuid,
    followee_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO follows (follower_id, followee_id, created_at)
        VALUES (?1, ?2, ?3)
        "#
    )
    .bind(follower_id)
    .bind(followee_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove the edge `follower -> followee`
///
/// # Returns
/// `true` if an edge was removed
pub async fn unfollow(
    pool: &SqlitePool,
    follower_id: Uuid,
    followee_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE follower_id = ?1 AND followee_id = ?2
        "#
    )
    .bind(follower_id)
    .bind(followee_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Users that `user_id` follows
pub async fn get_following(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<UserSummary>, sqlx::Error> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.username, u.email, u.first_name, u.last_name, u.password_hash, u.status, u.created_at, u.updated_at
        FROM follows f
        JOIN users u ON u.id = f.followee_id
        WHERE f.follower_id = ?1
        ORDER BY u.username
        "#
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(users.iter().map(User::summary).collect())
}

/// Users that follow `user_id`
pub async fn get_followers(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<UserSummary>, sqlx::Error> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.username, u.email, u.first_name, u.last_name, u.password_hash, u.status, u.created_at, u.updated_at
        FROM follows f
        JOIN users u ON u.id = f.follower_id
        WHERE f.followee_id = ?1
        ORDER BY u.username
        "#
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(users.iter().map(User::summary).collect())
}
