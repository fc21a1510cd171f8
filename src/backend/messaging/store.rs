/**
 * Message Store
 *
 * Per-room ordered message history.
 *
 * # Ordering
 *
 * Appends to the same room id are serialized by a per-room async lock, so
 * sequence numbers are gap-free and timestamps never go backwards within a
 * messenger. Appends to different rooms proceed concurrently. Each append
 * runs in one transaction: get-or-create the messenger, read the last
 * position, insert.
 *
 * # Direct Messages
 *
 * A direct conversation between two users uses the room id
 * `"{lo}-{hi}"`, where `lo`/`hi` are the two hyphenated user ids in
 * ascending order. `list_conversations` recognises these ids and attaches
 * both participants.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users;
use crate::backend::error::BackendError;
use crate::backend::messaging::db;
use crate::shared::{ConversationSummary, MessageView, Messenger};

type RoomLocks = HashMap<String, Arc<tokio::sync::Mutex<()>>>;

/// Room-scoped message persistence
#[derive(Clone)]
pub struct MessageStore {
    pool: SqlitePool,
    locks: Arc<Mutex<RoomLocks>>,
}

impl MessageStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get the messenger for a room id, creating it if needed
    ///
    /// # Returns
    /// The messenger and whether this call created it
    pub async fn get_or_create_messenger(&self, room_id: &str) -> Result<(Messenger, bool), BackendError> {
        let room_id = validate_room_id(room_id)?;

        let created = db::insert_messenger_if_absent(&self.pool, room_id).await?;
        let messenger = db::get_messenger(&self.pool, room_id)
            .await?
            .ok_or_else(|| BackendError::internal("Messenger vanished after creation"))?;

        if created {
            tracing::info!("[Messages] Messenger created for room {}", room_id);
        }

        Ok((messenger, created))
    }

    /// Append a message to a room
    ///
    /// # Errors
    /// * `InvalidInput` - blank room id, blank text, or neither sender nor text
    /// * `NotFound` - sender does not exist
    pub async fn append_message(
        &self,
        room_id: &str,
        sender_id: Option<Uuid>,
        text: Option<&str>,
    ) -> Result<MessageView, BackendError> {
        let room_id = validate_room_id(room_id)?;

        if let Some(text) = text {
            if text.trim().is_empty() {
                return Err(BackendError::invalid_input("Message text cannot be empty"));
            }
        }

        if sender_id.is_none() && text.is_none() {
            return Err(BackendError::invalid_input("A message needs a sender or text"));
        }

        if let Some(sender_id) = sender_id {
            if users::get_user_by_id(&self.pool, sender_id).await?.is_none() {
                return Err(BackendError::not_found("Sender not found"));
            }
        }

        let lock = self.room_lock(room_id);
        let message_id = {
            let _guard = lock.lock().await;
            self.append_locked(room_id, sender_id, text).await
        };
        self.release_room_lock(room_id, lock);
        let message_id = message_id?;

        let message = db::get_message(&self.pool, message_id)
            .await?
            .ok_or_else(|| BackendError::internal("Message vanished after append"))?;

        tracing::debug!("[Messages] Appended #{} to room {}", message.seq, room_id);

        Ok(message)
    }

    async fn append_locked(
        &self,
        room_id: &str,
        sender_id: Option<Uuid>,
        text: Option<&str>,
    ) -> Result<Uuid, BackendError> {
        let mut tx = self.pool.begin().await?;

        if db::insert_messenger_if_absent(&mut *tx, room_id).await? {
            tracing::info!("[Messages] Messenger created for room {}", room_id);
        }
        let messenger = db::get_messenger(&mut *tx, room_id)
            .await?
            .ok_or_else(|| BackendError::internal("Messenger vanished after creation"))?;

        let now = Utc::now();
        let (seq, created_at) = match db::last_position(&mut *tx, messenger.id).await? {
            Some((last_seq, last_at)) => (last_seq + 1, last_at.max(now)),
            None => (1, now),
        };

        let id = db::insert_message(&mut *tx, messenger.id, seq, sender_id, text, created_at).await?;
        tx.commit().await?;

        Ok(id)
    }

    /// Ordered history of a room; empty when nothing was ever sent
    pub async fn get_history(&self, room_id: &str) -> Result<Vec<MessageView>, BackendError> {
        let room_id = validate_room_id(room_id)?;
        Ok(db::get_history(&self.pool, room_id).await?)
    }

    /// Direct conversations with both participants resolved
    ///
    /// Messengers whose room id is not a user pair, or whose users no
    /// longer exist, are skipped.
    pub async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, BackendError> {
        let mut conversations = Vec::new();

        for messenger in db::list_messengers(&self.pool).await? {
            let Some((a, b)) = parse_direct_room_id(&messenger.room_id) else {
                continue;
            };
            let first = users::get_summary(&self.pool, a).await?;
            let second = users::get_summary(&self.pool, b).await?;
            if let (Some(first), Some(second)) = (first, second) {
                conversations.push(ConversationSummary {
                    messenger,
                    participants: vec![first, second],
                });
            }
        }

        Ok(conversations)
    }

    /// Direct conversations the user takes part in
    pub async fn list_conversations_for(&self, user_id: Uuid) -> Result<Vec<ConversationSummary>, BackendError> {
        let all = self.list_conversations().await?;
        Ok(all
            .into_iter()
            .filter(|c| c.participants.iter().any(|p| p.id == user_id))
            .collect())
    }

    fn room_lock(&self, room_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(room_id.to_string()).or_default().clone()
    }

    // Drop the map entry once nobody else holds or waits on the lock.
    fn release_room_lock(&self, room_id: &str, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if Arc::strong_count(&lock) == 2 {
            locks.remove(room_id);
        }
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

fn validate_room_id(room_id: &str) -> Result<&str, BackendError> {
    let room_id = room_id.trim();
    if room_id.is_empty() {
        return Err(BackendError::invalid_input("Room id cannot be empty"));
    }
    Ok(room_id)
}

/// Room id of the direct conversation between two users
///
/// Symmetric: `direct_room_id(a, b) == direct_room_id(b, a)`.
pub fn direct_room_id(a: Uuid, b: Uuid) -> String {
    let (a, b) = (a.to_string(), b.to_string());
    if a <= b {
        format!("{}-{}", a, b)
    } else {
        format!("{}-{}", b, a)
    }
}

/// Split a direct room id back into its two user ids
pub fn parse_direct_room_id(room_id: &str) -> Option<(Uuid, Uuid)> {
    room_id
        .match_indices('-')
        .find_map(|(at, _)| {
            let first = Uuid::parse_str(&room_id[..at]).ok()?;
            let second = Uuid::parse_str(&room_id[at + 1..]).ok()?;
            Some((first, second))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn store() -> MessageStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();
        MessageStore::new(pool)
    }

    #[test]
    fn test_direct_room_id_is_symmetric() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(direct_room_id(a, b), direct_room_id(b, a));
    }

    #[test]
    fn test_parse_direct_room_id() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let parsed = parse_direct_room_id(&direct_room_id(a, b)).unwrap();
        assert!(parsed == (a, b) || parsed == (b, a));
    }

    #[test]
    fn test_parse_rejects_plain_room_ids() {
        assert_eq!(parse_direct_room_id(&Uuid::new_v4().to_string()), None);
        assert_eq!(parse_direct_room_id("general"), None);
        assert_eq!(parse_direct_room_id(""), None);
    }

    #[tokio::test]
    async fn test_room_locks_are_released() {
        let store = store().await;
        store.append_message("lobby", None, Some("hello")).await.unwrap();
        store.append_message("lobby", None, Some("again")).await.unwrap();
        assert_eq!(store.tracked_locks(), 0);
    }

    #[tokio::test]
    async fn test_anonymous_message_gets_sequence() {
        let store = store().await;
        let first = store.append_message("lobby", None, Some("one")).await.unwrap();
        let second = store.append_message("lobby", None, Some("two")).await.unwrap();
        assert_eq!(first.seq, 1);
        assert_eq!(second.seq, 2);
        assert!(second.created_at >= first.created_at);
        assert!(first.sender.is_none());
    }
}
