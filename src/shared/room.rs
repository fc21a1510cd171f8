//! Room Wire Types
//!
//! Views and request bodies for invite-gated chat rooms. The password hash
//! and the invite token itself never leave the server through `RoomView`;
//! clients only learn whether a password is set and whether the room is
//! currently invitable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomState {
    /// No invite token has been minted yet
    Open,
    /// An invite token exists and can be used to join
    Invitable,
}

/// Room as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    pub id: Uuid,
    pub name: String,
    pub creator_id: Uuid,
    pub members: Vec<Uuid>,
    pub has_password: bool,
    pub state: RoomState,
    pub created_at: DateTime<Utc>,
}

impl RoomView {
    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.members.contains(&user_id)
    }
}

/// Request body for `POST /api/rooms`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request body for `PUT /api/rooms/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRoomRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request body for `POST /api/invites/{token}/join`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JoinRoomRequest {
    #[serde(default)]
    pub password: Option<String>,
}

/// Request body for `POST /api/rooms/{id}/members`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub user_id: Uuid,
}

/// Freshly minted invite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteLink {
    pub token: String,
    pub invite_link: String,
}
