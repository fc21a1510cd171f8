/**
 * Realtime Event Frames
 *
 * This module defines the frames exchanged over the realtime channel. Every
 * frame is a JSON object of the form `{"event": "<name>", "data": <payload>}`
 * where the event name is kebab-case.
 *
 * # Inbound (client to server)
 *
 * - `announce` - string user id; marks the user online
 * - `join-room` - string room id; subscribes the session to that room
 * - `get-room-messages` - string room id; requests the stored history
 * - `send-message` - `{roomId, message, sender}`; appends and fans out
 *
 * # Outbound (server to client)
 *
 * - `send-following` - the announcing user's following list
 * - `user-status-updated` - `{userId, status}`
 * - `room-messages` - ordered history of one room
 * - `receive-message` - `{roomId, message, sender, timestamp}`
 * - `error` - `{message}`, sent only to the session that caused it
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::message::MessageView;
use crate::shared::presence::UserStatus;
use crate::shared::user::UserSummary;

/// Frame sent by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    Announce(String),
    JoinRoom(String),
    GetRoomMessages(String),
    SendMessage(SendMessagePayload),
}

impl ClientEvent {
    /// Parse a text frame
    pub fn parse(frame: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(frame)?)
    }

    /// Event name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::Announce(_) => "announce",
            Self::JoinRoom(_) => "join-room",
            Self::GetRoomMessages(_) => "get-room-messages",
            Self::SendMessage(_) => "send-message",
        }
    }
}

/// Payload of `send-message`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
}

/// Frame sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    SendFollowing(Vec<UserSummary>),
    UserStatusUpdated(StatusUpdate),
    RoomMessages(Vec<MessageView>),
    ReceiveMessage(ReceivedMessage),
    Error(ErrorPayload),
}

impl ServerEvent {
    /// Build a scoped `error` frame
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorPayload {
            message: message.into(),
        })
    }

    /// Build a `user-status-updated` frame
    pub fn status_updated(user_id: Uuid, status: UserStatus) -> Self {
        Self::UserStatusUpdated(StatusUpdate { user_id, status })
    }

    /// Serialize to a text frame
    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Payload of `user-status-updated`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub user_id: Uuid,
    pub status: UserStatus,
}

/// Payload of `receive-message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedMessage {
    pub room_id: String,
    pub message: Option<String>,
    pub sender: Option<UserSummary>,
    pub timestamp: DateTime<Utc>,
}

impl From<&MessageView> for ReceivedMessage {
    fn from(view: &MessageView) -> Self {
        Self {
            room_id: view.room_id.clone(),
            message: view.text.clone(),
            sender: view.sender.clone(),
            timestamp: view.created_at,
        }
    }
}

/// Payload of `error`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}
