/**
 * Realtime Session Gateway
 *
 * Dispatches inbound frames of one connection to the presence tracker and
 * the message store, and fans results out through the broadcast hub.
 *
 * # Events
 *
 * | Inbound | Effect | Outbound |
 * |---|---|---|
 * | `announce` | mark online, join `user-{self}` | `send-following` to caller, `user-status-updated` to audience |
 * | `join-room` | join the room's broadcast key | none |
 * | `get-room-messages` | read history | `room-messages` to caller |
 * | `send-message` | append | `receive-message` to the room, sender included |
 * | disconnect | leave all keys, mark offline if identified | `user-status-updated` to audience |
 *
 * # Failures
 *
 * A malformed, invalid or unauthorized frame yields an `error` frame to the
 * originating session only. The connection stays open.
 *
 * A session may only announce as the user behind its token and may only
 * send messages as itself or anonymously.
 *
 * # Presence Keys
 *
 * `user-{X}` holds only the sessions of X. Who hears a status change is
 * decided by the follow graph at publish time, not by keys joined earlier.
 */

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::messaging::MessageStore;
use crate::backend::presence::{PresenceTracker, PresenceTransition};
use crate::backend::realtime::broadcast::BroadcastHub;
use crate::backend::realtime::session::{Session, SessionState};
use crate::shared::user::user_key;
use crate::shared::{ClientEvent, ReceivedMessage, SendMessagePayload, ServerEvent};

/// Entry point for realtime connections
#[derive(Clone)]
pub struct Gateway {
    hub: BroadcastHub,
    presence: PresenceTracker,
    messages: MessageStore,
}

impl Gateway {
    pub fn new(hub: BroadcastHub, presence: PresenceTracker, messages: MessageStore) -> Self {
        Self {
            hub,
            presence,
            messages,
        }
    }

    /// Open a session for an authenticated user
    ///
    /// # Returns
    /// The session record and the receiver of its outbound frames
    pub fn connect(&self, authenticated_user: Uuid) -> (Session, mpsc::UnboundedReceiver<ServerEvent>) {
        let (id, rx) = self.hub.register();
        tracing::info!("[Gateway] Session {} opened for user {}", id, authenticated_user);
        (Session::new(id, authenticated_user), rx)
    }

    /// Handle one text frame
    pub async fn handle_frame(&self, session: &mut Session, frame: &str) {
        match ClientEvent::parse(frame) {
            Ok(event) => self.handle(session, event).await,
            Err(e) => {
                tracing::warn!("[Gateway] Malformed frame on session {}: {}", session.id, e);
                self.hub.emit_to(session.id, ServerEvent::error(format!("Malformed event: {}", e)));
            }
        }
    }

    /// Handle one parsed event; failures go back to this session only
    pub async fn handle(&self, session: &mut Session, event: ClientEvent) {
        let name = event.name();
        if let Err(e) = self.dispatch(session, event).await {
            tracing::warn!("[Gateway] {} failed on session {}: {}", name, session.id, e);
            self.hub.emit_to(session.id, ServerEvent::error(e.message()));
        }
    }

    async fn dispatch(&self, session: &mut Session, event: ClientEvent) -> Result<(), BackendError> {
        if session.state == SessionState::Disconnected {
            return Err(BackendError::invalid_input("Session is closed"));
        }

        match event {
            ClientEvent::Announce(user_id) => self.announce(session, &user_id).await,
            ClientEvent::JoinRoom(room_id) => self.join_room(session, &room_id),
            ClientEvent::GetRoomMessages(room_id) => self.get_room_messages(session, &room_id).await,
            ClientEvent::SendMessage(payload) => self.send_message(session, payload).await,
        }
    }

    async fn announce(&self, session: &mut Session, user_id: &str) -> Result<(), BackendError> {
        let user_id = parse_user_id(user_id)?;
        if user_id != session.authenticated_user {
            return Err(BackendError::forbidden("You can only announce yourself"));
        }

        let transition = self.presence.mark_online(user_id).await?;

        self.join_key(session, user_key(user_id));
        session.connected_user_id = Some(user_id);
        session.state = SessionState::Identified;

        self.hub
            .emit_to(session.id, ServerEvent::SendFollowing(transition.following.clone()));
        self.presence.publish(&transition);

        tracing::info!("[Gateway] Session {} identified as {}", session.id, user_id);
        Ok(())
    }

    fn join_room(&self, session: &mut Session, room_id: &str) -> Result<(), BackendError> {
        let room_id = room_id.trim();
        if room_id.is_empty() {
            return Err(BackendError::invalid_input("Room id cannot be empty"));
        }

        self.join_key(session, room_id.to_string());
        tracing::debug!("[Gateway] Session {} joined {}", session.id, room_id);
        Ok(())
    }

    async fn get_room_messages(&self, session: &mut Session, room_id: &str) -> Result<(), BackendError> {
        let history = self.messages.get_history(room_id).await?;
        self.hub.emit_to(session.id, ServerEvent::RoomMessages(history));
        Ok(())
    }

    async fn send_message(&self, session: &mut Session, payload: SendMessagePayload) -> Result<(), BackendError> {
        let room_id = payload
            .room_id
            .ok_or_else(|| BackendError::invalid_input("Room id is required"))?;

        let sender = payload.sender.as_deref().map(parse_user_id).transpose()?;
        if let Some(sender) = sender {
            if sender != session.authenticated_user {
                return Err(BackendError::forbidden("You can only send messages as yourself"));
            }
        }

        let message = self
            .messages
            .append_message(&room_id, sender, payload.message.as_deref())
            .await?;

        let reached = self.hub.broadcast(
            &message.room_id,
            ServerEvent::ReceiveMessage(ReceivedMessage::from(&message)),
        );
        tracing::debug!("[Gateway] Message #{} in {} reached {} sessions", message.seq, message.room_id, reached);
        Ok(())
    }

    /// Close a session
    ///
    /// Leaves every broadcast key and, if the session had announced, marks
    /// its user offline and publishes the transition.
    pub async fn disconnect(&self, mut session: Session) -> Option<PresenceTransition> {
        self.hub.unregister(session.id);
        session.keys.clear();
        session.state = SessionState::Disconnected;
        tracing::info!("[Gateway] Session {} closed", session.id);

        let user_id = session.connected_user_id?;
        match self.presence.mark_offline(user_id).await {
            Ok(transition) => {
                self.presence.publish(&transition);
                Some(transition)
            }
            Err(e) => {
                tracing::error!("[Gateway] Failed to mark {} offline: {}", user_id, e);
                None
            }
        }
    }

    fn join_key(&self, session: &mut Session, key: String) {
        if self.hub.join(session.id, &key) {
            session.keys.insert(key);
        }
    }
}

fn parse_user_id(value: &str) -> Result<Uuid, BackendError> {
    Uuid::parse_str(value.trim()).map_err(|_| BackendError::invalid_input("Invalid user id"))
}
