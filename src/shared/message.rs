//! Message Wire Types
//!
//! A `Messenger` is the persisted conversation record for one room id. The
//! room id is free-form: either the id of a registered room, or a direct
//! message key built from two user ids. Messages inside a messenger are
//! numbered from 1 in append order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::user::UserSummary;

/// Conversation record keyed by room id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Messenger {
    pub id: Uuid,
    pub room_id: String,
    pub created_at: DateTime<Utc>,
}

/// Stored message with its sender resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: Uuid,
    pub room_id: String,
    /// 1-based position inside the messenger
    pub seq: i64,
    /// `None` when no sender was given or the sender no longer exists
    pub sender: Option<UserSummary>,
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Direct conversation with both participants attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub messenger: Messenger,
    pub participants: Vec<UserSummary>,
}

/// Request body for `POST /api/messengers/{room_id}/messages`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostMessageRequest {
    #[serde(default)]
    pub message: Option<String>,
}
