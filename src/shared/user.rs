//! Public User Projection
//!
//! `UserSummary` is what other users get to see about an account: it never
//! carries the email address or the password hash.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::presence::UserStatus;

/// Public profile of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub status: UserStatus,
}

impl UserSummary {
    /// Broadcast key under which sessions of this user are grouped
    pub fn broadcast_key(&self) -> String {
        user_key(self.id)
    }
}

/// Broadcast key for a user id: `user-{id}`
pub fn user_key(user_id: Uuid) -> String {
    format!("user-{}", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_key_format() {
        let id = Uuid::nil();
        assert_eq!(user_key(id), "user-00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = UserSummary {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            first_name: "Alice".to_string(),
            last_name: None,
            status: UserStatus::Online,
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["firstName"], "Alice");
        assert_eq!(value["status"], "online");
        assert!(value.get("email").is_none());
    }
}
