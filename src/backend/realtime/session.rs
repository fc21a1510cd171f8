//! Realtime Session Record
//!
//! One `Session` per WebSocket connection. It is owned by the connection
//! task and passed by `&mut` into every gateway call, so all per-connection
//! state lives here rather than in globals.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::backend::realtime::broadcast::SessionId;

/// Lifecycle of a connection: `Connected → Identified → Disconnected`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Socket open, no announce yet
    Connected,
    /// `announce` accepted; presence is tracked for `connected_user_id`
    Identified,
    /// Socket closed; the session is gone from the hub
    Disconnected,
}

/// Per-connection state
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    /// User behind the bearer token used to open the socket
    pub authenticated_user: Uuid,
    /// User announced on this connection
    pub connected_user_id: Option<Uuid>,
    /// Broadcast keys this session joined
    pub keys: BTreeSet<String>,
    pub state: SessionState,
}

impl Session {
    pub fn new(id: SessionId, authenticated_user: Uuid) -> Self {
        Self {
            id,
            authenticated_user,
            connected_user_id: None,
            keys: BTreeSet::new(),
            state: SessionState::Connected,
        }
    }
}
