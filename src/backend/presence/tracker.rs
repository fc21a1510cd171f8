/**
 * Presence Tracker
 *
 * Online/offline transitions and who gets told about them.
 *
 * # Audience
 *
 * A transition of user U is published to every session joined to
 * `user-{U}` and to `user-{X}` for every X in U's followers and following.
 * Only X's own sessions join `user-{X}`. The audience is read from the
 * follow graph at transition time and never cached, so a follow made a
 * moment ago is already honoured and an unfollow already takes effect. A session
 * reached through several keys receives the frame once.
 */

use std::collections::BTreeSet;

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users;
use crate::backend::error::BackendError;
use crate::backend::realtime::BroadcastHub;
use crate::shared::user::user_key;
use crate::shared::{ServerEvent, UserStatus, UserSummary};

/// Result of a status change, carrying the graph needed to publish it
#[derive(Debug, Clone)]
pub struct PresenceTransition {
    pub user: UserSummary,
    pub status: UserStatus,
    pub following: Vec<UserSummary>,
    pub followers: Vec<UserSummary>,
}

impl PresenceTransition {
    /// Broadcast keys that should hear about this transition
    pub fn audience(&self) -> Vec<String> {
        let mut keys = BTreeSet::new();
        keys.insert(user_key(self.user.id));
        for other in self.following.iter().chain(self.followers.iter()) {
            keys.insert(other.broadcast_key());
        }
        keys.into_iter().collect()
    }

    /// The `user-status-updated` frame for this transition
    pub fn event(&self) -> ServerEvent {
        ServerEvent::status_updated(self.user.id, self.status)
    }
}

/// Presence service
#[derive(Clone)]
pub struct PresenceTracker {
    pool: SqlitePool,
    hub: BroadcastHub,
}

impl PresenceTracker {
    pub fn new(pool: SqlitePool, hub: BroadcastHub) -> Self {
        Self { pool, hub }
    }

    /// Mark a user online
    ///
    /// # Errors
    /// `NotFound` if no user has this id
    pub async fn mark_online(&self, user_id: Uuid) -> Result<PresenceTransition, BackendError> {
        self.set_status(user_id, UserStatus::Online).await
    }

    /// Mark a user offline
    ///
    /// # Errors
    /// `NotFound` if no user has this id
    pub async fn mark_offline(&self, user_id: Uuid) -> Result<PresenceTransition, BackendError> {
        self.set_status(user_id, UserStatus::Offline).await
    }

    /// Store a status and collect the graph around the user
    pub async fn set_status(
        &self,
        user_id: Uuid,
        status: UserStatus,
    ) -> Result<PresenceTransition, BackendError> {
        let user = users::set_status(&self.pool, user_id, status)
            .await?
            .ok_or_else(|| BackendError::not_found("User not found"))?;

        let following = users::get_following(&self.pool, user_id).await?;
        let followers = users::get_followers(&self.pool, user_id).await?;

        tracing::info!(
            "[Presence] {} is now {} ({} following, {} followers)",
            user.username,
            status,
            following.len(),
            followers.len()
        );

        Ok(PresenceTransition {
            user: user.summary(),
            status,
            following,
            followers,
        })
    }

    /// Deliver `user-status-updated` to the transition's audience
    ///
    /// # Returns
    /// Number of sessions reached; an empty audience is not an error
    pub fn publish(&self, transition: &PresenceTransition) -> usize {
        let reached = self.hub.broadcast_many(&transition.audience(), transition.event());
        tracing::debug!(
            "[Presence] Status of {} delivered to {} sessions",
            transition.user.id,
            reached
        );
        reached
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str) -> UserSummary {
        UserSummary {
            id: Uuid::new_v4(),
            username: name.to_string(),
            first_name: name.to_string(),
            last_name: None,
            status: UserStatus::Offline,
        }
    }

    #[test]
    fn test_audience_includes_self_and_both_directions() {
        let me = summary("me");
        let followed = summary("followed");
        let follower = summary("follower");
        let transition = PresenceTransition {
            user: me.clone(),
            status: UserStatus::Online,
            following: vec![followed.clone()],
            followers: vec![follower.clone()],
        };

        let audience = transition.audience();
        assert_eq!(audience.len(), 3);
        assert!(audience.contains(&user_key(me.id)));
        assert!(audience.contains(&user_key(followed.id)));
        assert!(audience.contains(&user_key(follower.id)));
    }

    #[test]
    fn test_audience_dedupes_mutual_follows() {
        let me = summary("me");
        let friend = summary("friend");
        let transition = PresenceTransition {
            user: me,
            status: UserStatus::Offline,
            following: vec![friend.clone()],
            followers: vec![friend],
        };

        assert_eq!(transition.audience().len(), 2);
    }
}
