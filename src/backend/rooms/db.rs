//! Database operations for rooms
//!
//! Plain queries over `rooms` and `room_members`. Authorization lives in
//! `RoomRegistry`; these functions do exactly what their name says.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Row of the `rooms` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoomRecord {
    pub id: Uuid,
    pub name: String,
    pub creator_id: Uuid,
    pub password_hash: Option<String>,
    pub invite_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert a room and its creator's membership in one transaction
pub async fn insert_room(
    pool: &SqlitePool,
    name: &str,
    creator_id: Uuid,
    password_hash: Option<&str>,
) -> Result<RoomRecord, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    let room = sqlx::query_as::<_, RoomRecord>(
        r#"
        INSERT INTO rooms (id, name, creator_id, password_hash, invite_token, created_at)
        VALUES (?1, ?2, ?3, ?4, NULL, ?5)
        RETURNING id, name, creator_id, password_hash, invite_token, created_at
        "#
    )
    .bind(id)
    .bind(name)
    .bind(creator_id)
    .bind(password_hash)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT OR IGNORE INTO room_members (room_id, user_id, joined_at)
        VALUES (?1, ?2, ?3)
        "#
    )
    .bind(id)
    .bind(creator_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(room)
}

/// Get a room by ID
pub async fn get_room(
    pool: &SqlitePool,
    room_id: Uuid,
) -> Result<Option<RoomRecord>, sqlx::Error> {
    sqlx::query_as::<_, RoomRecord>(
        r#"
        SELECT id, name, creator_id, password_hash, invite_token, created_at
        FROM rooms
        WHERE id = ?1
        "#
    )
    .bind(room_id)
    .fetch_optional(pool)
    .await
}

/// Get the room currently holding an invite token
pub async fn get_room_by_token(
    pool: &SqlitePool,
    token: &str,
) -> Result<Option<RoomRecord>, sqlx::Error> {
    sqlx::query_as::<_, RoomRecord>(
        r#"
        SELECT id, name, creator_id, password_hash, invite_token, created_at
        FROM rooms
        WHERE invite_token = ?1
        "#
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

/// Rooms the user is a member of, oldest first
pub async fn list_rooms_for_user(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<RoomRecord>, sqlx::Error> {
    sqlx::query_as::<_, RoomRecord>(
        r#"
        SELECT r.id, r.name, r.creator_id, r.password_hash, r.invite_token, r.created_at
        FROM rooms r
        JOIN room_members m ON m.room_id = r.id
        WHERE m.user_id = ?1
        ORDER BY r.created_at, r.name
        "#
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Member ids in join order
pub async fn member_ids(
    pool: &SqlitePool,
    room_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT user_id
        FROM room_members
        WHERE room_id = ?1
        ORDER BY rowid
        "#
    )
    .bind(room_id)
    .fetch_all(pool)
    .await
}

/// Whether the user is a member of the room
pub async fn is_member(
    pool: &SqlitePool,
    room_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM room_members
        WHERE room_id = ?1 AND user_id = ?2
        "#
    )
    .bind(room_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Set-add a member
///
/// # Returns
/// `true` if the user was not a member before
pub async fn add_member(
    pool: &SqlitePool,
    room_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO room_members (room_id, user_id, joined_at)
        VALUES (?1, ?2, ?3)
        "#
    )
    .bind(room_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a member
///
/// # Returns
/// `true` if a membership was removed
pub async fn remove_member(
    pool: &SqlitePool,
    room_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM room_members
        WHERE room_id = ?1 AND user_id = ?2
        "#
    )
    .bind(room_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Overwrite the room's invite token
pub async fn set_invite_token(
    pool: &SqlitePool,
    room_id: Uuid,
    token: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE rooms
        SET invite_token = ?1
        WHERE id = ?2
        "#
    )
    .bind(token)
    .bind(room_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Replace name and password hash
pub async fn update_room(
    pool: &SqlitePool,
    room_id: Uuid,
    name: &str,
    password_hash: Option<&str>,
) -> Result<Option<RoomRecord>, sqlx::Error> {
    sqlx::query_as::<_, RoomRecord>(
        r#"
        UPDATE rooms
        SET name = ?1, password_hash = ?2
        WHERE id = ?3
        RETURNING id, name, creator_id, password_hash, invite_token, created_at
        "#
    )
    .bind(name)
    .bind(password_hash)
    .bind(room_id)
    .fetch_optional(pool)
    .await
}

/// Delete a room; memberships cascade
pub async fn delete_room(
    pool: &SqlitePool,
    room_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM rooms
        WHERE id = ?1
        "#
    )
    .bind(room_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
