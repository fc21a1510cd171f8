/**
 * Room Registry
 *
 * This module enforces the rules around invite-gated chat rooms on top of
 * the plain queries in `rooms::db`.
 *
 * # Rules
 *
 * - The creator is fixed at creation and is always a member.
 * - Creator or members may mint an invite; a new token replaces the old one.
 * - Joining by token checks the room password when one is set.
 * - Only the creator may add or remove members, rename the room, change its
 *   password or delete it. The creator cannot be removed.
 *
 * Every mutating operation re-reads the room from the store before its
 * checks, and all checks run before any write.
 */

use std::sync::Arc;

use rand::Rng;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users;
use crate::backend::error::BackendError;
use crate::backend::rooms::db::{self, RoomRecord};
use crate::shared::{AppConfig, InviteLink, RoomState, RoomView, UserSummary};

/// Number of random bytes in an invite token
pub const INVITE_TOKEN_BYTES: usize = 20;

/// Invite-gated room membership service
#[derive(Clone)]
pub struct RoomRegistry {
    pool: SqlitePool,
    config: Arc<AppConfig>,
}

impl RoomRegistry {
    pub fn new(pool: SqlitePool, config: Arc<AppConfig>) -> Self {
        Self { pool, config }
    }

    /// Create a room with the creator as its only member
    ///
    /// # Errors
    /// * `InvalidInput` - name is blank
    /// * `NotFound` - creator does not exist
    pub async fn create_room(
        &self,
        name: &str,
        creator_id: Uuid,
        password: Option<&str>,
    ) -> Result<RoomView, BackendError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BackendError::invalid_input("Room name cannot be empty"));
        }

        if users::get_user_by_id(&self.pool, creator_id).await?.is_none() {
            return Err(BackendError::not_found("Creator not found"));
        }

        let password_hash = self.hash_password(password)?;
        let record = db::insert_room(&self.pool, name, creator_id, password_hash.as_deref()).await?;

        tracing::info!("[Rooms] Room {} '{}' created by {}", record.id, record.name, creator_id);

        self.view(record).await
    }

    /// Get a room by id
    pub async fn get_room(&self, room_id: Uuid) -> Result<RoomView, BackendError> {
        let record = self.load(room_id).await?;
        self.view(record).await
    }

    /// Rooms the user belongs to
    pub async fn list_rooms_for(&self, user_id: Uuid) -> Result<Vec<RoomView>, BackendError> {
        let records = db::list_rooms_for_user(&self.pool, user_id).await?;
        let mut rooms = Vec::with_capacity(records.len());
        for record in records {
            rooms.push(self.view(record).await?);
        }
        Ok(rooms)
    }

    /// Rename a room or change its password (creator only)
    ///
    /// `password` of `None` keeps the current password, a blank password
    /// removes it, anything else replaces it.
    pub async fn update_room(
        &self,
        room_id: Uuid,
        requester_id: Uuid,
        name: Option<&str>,
        password: Option<&str>,
    ) -> Result<RoomView, BackendError> {
        let record = self.load(room_id).await?;
        ensure_creator(&record, requester_id, "Only the creator can update the room")?;

        let name = match name.map(str::trim) {
            Some("") => return Err(BackendError::invalid_input("Room name cannot be empty")),
            Some(name) => name.to_string(),
            None => record.name.clone(),
        };

        let password_hash = match password {
            Some(password) => self.hash_password(Some(password))?,
            None => record.password_hash.clone(),
        };

        let updated = db::update_room(&self.pool, room_id, &name, password_hash.as_deref())
            .await?
            .ok_or_else(|| BackendError::not_found("Room not found"))?;

        tracing::info!("[Rooms] Room {} updated by {}", room_id, requester_id);

        self.view(updated).await
    }

    /// Delete a room and its memberships (creator only)
    pub async fn delete_room(&self, room_id: Uuid, requester_id: Uuid) -> Result<(), BackendError> {
        let record = self.load(room_id).await?;
        ensure_creator(&record, requester_id, "Only the creator can delete the room")?;

        db::delete_room(&self.pool, room_id).await?;
        tracing::info!("[Rooms] Room {} deleted by {}", room_id, requester_id);

        Ok(())
    }

    /// Mint a fresh invite token, replacing any previous one
    ///
    /// # Errors
    /// * `NotFound` - unknown room
    /// * `Forbidden` - requester is neither creator nor member
    pub async fn generate_invite(
        &self,
        room_id: Uuid,
        requester_id: Uuid,
    ) -> Result<InviteLink, BackendError> {
        let record = self.load(room_id).await?;

        if record.creator_id != requester_id
            && !db::is_member(&self.pool, room_id, requester_id).await?
        {
            return Err(BackendError::forbidden("Only room members can create invites"));
        }

        let token = mint_invite_token();
        db::set_invite_token(&self.pool, room_id, &token).await?;

        tracing::info!("[Rooms] Invite minted for room {} by {}", room_id, requester_id);

        Ok(InviteLink {
            invite_link: self.config.invite_link(&token),
            token,
        })
    }

    /// Join the room holding `token`
    ///
    /// Joining twice leaves a single membership.
    ///
    /// # Errors
    /// * `NotFound` - token matches no room, or user does not exist
    /// * `BadCredentials` - room has a password and it is missing or wrong
    pub async fn join_room(
        &self,
        token: &str,
        user_id: Uuid,
        password: Option<&str>,
    ) -> Result<RoomView, BackendError> {
        let record = db::get_room_by_token(&self.pool, token.trim())
            .await?
            .ok_or_else(|| BackendError::not_found("Invalid invite token"))?;

        if users::get_user_by_id(&self.pool, user_id).await?.is_none() {
            return Err(BackendError::not_found("User not found"));
        }

        if let Some(hash) = record.password_hash.as_deref() {
            let password = password.ok_or_else(|| BackendError::bad_credentials("Room password required"))?;
            if !bcrypt::verify(password, hash)? {
                tracing::warn!("[Rooms] Wrong password for room {} from {}", record.id, user_id);
                return Err(BackendError::bad_credentials("Incorrect room password"));
            }
        }

        let added = db::add_member(&self.pool, record.id, user_id).await?;
        tracing::info!("[Rooms] User {} joined room {} (new member: {})", user_id, record.id, added);

        self.view(record).await
    }

    /// Member summaries of a room (members only)
    pub async fn list_members(
        &self,
        room_id: Uuid,
        requester_id: Uuid,
    ) -> Result<Vec<UserSummary>, BackendError> {
        self.load(room_id).await?;

        if !db::is_member(&self.pool, room_id, requester_id).await? {
            return Err(BackendError::forbidden("Only room members can list members"));
        }

        let mut members = Vec::new();
        for user_id in db::member_ids(&self.pool, room_id).await? {
            if let Some(summary) = users::get_summary(&self.pool, user_id).await? {
                members.push(summary);
            }
        }
        Ok(members)
    }

    /// Add a user to the room (creator only, idempotent)
    ///
    /// # Errors
    /// * `NotFound` - unknown room or user
    /// * `Forbidden` - requester is not the creator
    pub async fn add_member(
        &self,
        room_id: Uuid,
        requester_id: Uuid,
        user_id: Uuid,
    ) -> Result<RoomView, BackendError> {
        let record = self.load(room_id).await?;
        ensure_creator(&record, requester_id, "Only the creator can add members")?;

        if users::get_user_by_id(&self.pool, user_id).await?.is_none() {
            return Err(BackendError::not_found("User not found"));
        }

        let added = db::add_member(&self.pool, room_id, user_id).await?;
        tracing::info!("[Rooms] User {} added to room {} (new member: {})", user_id, room_id, added);

        self.view(record).await
    }

    /// Remove a user from the room (creator only)
    ///
    /// # Errors
    /// * `NotFound` - unknown room, or target is not a member
    /// * `Forbidden` - requester is not the creator
    /// * `InvalidInput` - target is the creator
    pub async fn remove_member(
        &self,
        room_id: Uuid,
        requester_id: Uuid,
        user_id: Uuid,
    ) -> Result<RoomView, BackendError> {
        let record = self.load(room_id).await?;
        ensure_creator(&record, requester_id, "Only the creator can remove members")?;

        if user_id == record.creator_id {
            return Err(BackendError::invalid_input("The room creator cannot be removed"));
        }

        if !db::is_member(&self.pool, room_id, user_id).await? {
            return Err(BackendError::not_found("User is not a member of this room"));
        }

        db::remove_member(&self.pool, room_id, user_id).await?;
        tracing::info!("[Rooms] User {} removed from room {}", user_id, room_id);

        self.view(record).await
    }

    async fn load(&self, room_id: Uuid) -> Result<RoomRecord, BackendError> {
        db::get_room(&self.pool, room_id)
            .await?
            .ok_or_else(|| BackendError::not_found("Room not found"))
    }

    async fn view(&self, record: RoomRecord) -> Result<RoomView, BackendError> {
        let members = db::member_ids(&self.pool, record.id).await?;
        Ok(RoomView {
            id: record.id,
            name: record.name,
            creator_id: record.creator_id,
            members,
            has_password: record.password_hash.is_some(),
            state: room_state(record.invite_token.as_deref()),
            created_at: record.created_at,
        })
    }

    fn hash_password(&self, password: Option<&str>) -> Result<Option<String>, BackendError> {
        match password.filter(|p| !p.is_empty()) {
            Some(password) => Ok(Some(bcrypt::hash(password, self.config.bcrypt_cost)?)),
            None => Ok(None),
        }
    }
}

fn ensure_creator(record: &RoomRecord, requester_id: Uuid, message: &str) -> Result<(), BackendError> {
    if record.creator_id != requester_id {
        tracing::warn!("[Rooms] {} is not the creator of room {}", requester_id, record.id);
        return Err(BackendError::forbidden(message));
    }
    Ok(())
}

fn room_state(invite_token: Option<&str>) -> RoomState {
    match invite_token {
        Some(_) => RoomState::Invitable,
        None => RoomState::Open,
    }
}

/// 20 random bytes, hex encoded
pub fn mint_invite_token() -> String {
    let mut bytes = [0u8; INVITE_TOKEN_BYTES];
    rand::rng().fill(&mut bytes[..]);
    hex::encode(bytes)
}
