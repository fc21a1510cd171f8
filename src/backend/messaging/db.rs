//! Database operations for messaging
//!
//! Queries over `messengers` and `messages`. The write-path functions take
//! any SQLite executor so `MessageStore` can run them inside a transaction.

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Executor, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::shared::{MessageView, Messenger, UserStatus, UserSummary};

fn messenger_from_row(row: &SqliteRow) -> Result<Messenger, sqlx::Error> {
    Ok(Messenger {
        id: row.try_get("id")?,
        room_id: row.try_get("room_id")?,
        created_at: row.try_get("created_at")?,
    })
}

fn message_from_row(row: &SqliteRow) -> Result<MessageView, sqlx::Error> {
    let sender_id: Option<Uuid> = row.try_get("sender_id")?;
    let username: Option<String> = row.try_get("username")?;

    // A sender id whose user is gone resolves to no sender.
    let sender = match (sender_id, username) {
        (Some(id), Some(username)) => {
            let status: Option<String> = row.try_get("status")?;
            let status = match status {
                Some(value) => value
                    .parse::<UserStatus>()
                    .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
                None => UserStatus::Offline,
            };
            Some(UserSummary {
                id,
                username,
                first_name: row.try_get::<Option<String>, _>("first_name")?.unwrap_or_default(),
                last_name: row.try_get("last_name")?,
                status,
            })
        }
        _ => None,
    };

    Ok(MessageView {
        id: row.try_get("id")?,
        room_id: row.try_get("room_id")?,
        seq: row.try_get("seq")?,
        sender,
        text: row.try_get("text")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Get the messenger for a room id
pub async fn get_messenger<'e, E>(
    executor: E,
    room_id: &str,
) -> Result<Option<Messenger>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        r#"
        SELECT id, room_id, created_at
        FROM messengers
        WHERE room_id = ?1
        "#
    )
    .bind(room_id)
    .fetch_optional(executor)
    .await?;

    row.as_ref().map(messenger_from_row).transpose()
}

/// Insert a messenger unless one already exists for the room id
///
/// # Returns
/// `true` if this call created it
pub async fn insert_messenger_if_absent<'e, E>(
    executor: E,
    room_id: &str,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO messengers (id, room_id, created_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (room_id) DO NOTHING
        "#
    )
    .bind(Uuid::new_v4())
    .bind(room_id)
    .bind(Utc::now())
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Sequence number and timestamp of the newest message in a messenger
pub async fn last_position<'e, E>(
    executor: E,
    messenger_id: Uuid,
) -> Result<Option<(i64, DateTime<Utc>)>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        r#"
        SELECT seq, created_at
        FROM messages
        WHERE messenger_id = ?1
        ORDER BY seq DESC
        LIMIT 1
        "#
    )
    .bind(messenger_id)
    .fetch_optional(executor)
    .await?;

    match row {
        Some(r) => Ok(Some((r.try_get("seq")?, r.try_get("created_at")?))),
        None => Ok(None),
    }
}

/// Insert one message row
pub async fn insert_message<'e, E>(
    executor: E,
    messenger_id: Uuid,
    seq: i64,
    sender_id: Option<Uuid>,
    text: Option<&str>,
    created_at: DateTime<Utc>,
) -> Result<Uuid, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO messages (id, messenger_id, seq, sender_id, text, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#
    )
    .bind(id)
    .bind(messenger_id)
    .bind(seq)
    .bind(sender_id)
    .bind(text)
    .bind(created_at)
    .execute(executor)
    .await?;

    Ok(id)
}

/// Get one message with its sender resolved
pub async fn get_message(
    pool: &SqlitePool,
    message_id: Uuid,
) -> Result<Option<MessageView>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT m.id, c.room_id, m.seq, m.sender_id, m.text, m.created_at,
               u.username, u.first_name, u.last_name, u.status
        FROM messages m
        JOIN messengers c ON c.id = m.messenger_id
        LEFT JOIN users u ON u.id = m.sender_id
        WHERE m.id = ?1
        "#
    )
    .bind(message_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(message_from_row).transpose()
}

/// Full history of a room in append order
pub async fn get_history(
    pool: &SqlitePool,
    room_id: &str,
) -> Result<Vec<MessageView>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT m.id, c.room_id, m.seq, m.sender_id, m.text, m.created_at,
               u.username, u.first_name, u.last_name, u.status
        FROM messages m
        JOIN messengers c ON c.id = m.messenger_id
        LEFT JOIN users u ON u.id = m.sender_id
        WHERE c.room_id = ?1
        ORDER BY m.seq
        "#
    )
    .bind(room_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(message_from_row).collect()
}

/// All messengers, oldest first
pub async fn list_messengers(pool: &SqlitePool) -> Result<Vec<Messenger>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, room_id, created_at
        FROM messengers
        ORDER BY created_at, room_id
        "#
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(messenger_from_row).collect()
}
