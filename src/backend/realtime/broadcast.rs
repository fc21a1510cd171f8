/**
 * Broadcast Hub
 *
 * This module keeps the in-memory map from broadcast keys to connected
 * sessions and delivers outbound frames to them.
 *
 * # Broadcast Keys
 *
 * A key is a named group of sessions: `user-{id}` for presence audiences,
 * or a room id for chat fan-out. Keys exist only while at least one
 * session is joined to them.
 *
 * # Delivery
 *
 * Every session owns an unbounded channel; the connection task drains it
 * into the socket. Fan-out therefore never awaits and never blocks on a
 * slow client. A session reached through several keys of one broadcast
 * receives the frame once.
 */

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::shared::ServerEvent;

/// Identifier of one realtime connection
pub type SessionId = Uuid;

#[derive(Default)]
struct HubInner {
    senders: HashMap<SessionId, mpsc::UnboundedSender<ServerEvent>>,
    key_sessions: HashMap<String, HashSet<SessionId>>,
    session_keys: HashMap<SessionId, HashSet<String>>,
}

/// Shared registry of sessions and broadcast keys
#[derive(Clone, Default)]
pub struct BroadcastHub {
    inner: Arc<Mutex<HubInner>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a new session
    ///
    /// # Returns
    /// The session id and the receiver its connection task drains
    pub fn register(&self) -> (SessionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();

        let mut inner = self.lock();
        inner.senders.insert(id, tx);
        inner.session_keys.insert(id, HashSet::new());
        tracing::debug!("[Realtime] Session {} registered ({} active)", id, inner.senders.len());

        (id, rx)
    }

    /// Remove a session and leave all its keys
    ///
    /// # Returns
    /// The keys the session was joined to
    pub fn unregister(&self, session_id: SessionId) -> Vec<String> {
        let mut inner = self.lock();
        inner.senders.remove(&session_id);
        let keys: Vec<String> = inner
            .session_keys
            .remove(&session_id)
            .map(|keys| keys.into_iter().collect())
            .unwrap_or_default();

        for key in &keys {
            remove_from_key(&mut inner, key, session_id);
        }

        tracing::debug!(
            "[Realtime] Session {} unregistered, left {} keys ({} active)",
            session_id,
            keys.len(),
            inner.senders.len()
        );
        keys
    }

    /// Join a session to a broadcast key
    ///
    /// # Returns
    /// `false` if the session is not registered
    pub fn join(&self, session_id: SessionId, key: &str) -> bool {
        let mut inner = self.lock();
        let Some(keys) = inner.session_keys.get_mut(&session_id) else {
            return false;
        };
        keys.insert(key.to_string());
        inner
            .key_sessions
            .entry(key.to_string())
            .or_default()
            .insert(session_id);
        true
    }

    /// Send a frame to one session
    ///
    /// # Returns
    /// `true` if the session is registered and its receiver is alive
    pub fn emit_to(&self, session_id: SessionId, event: ServerEvent) -> bool {
        let inner = self.lock();
        inner
            .senders
            .get(&session_id)
            .map(|tx| tx.send(event).is_ok())
            .unwrap_or(false)
    }

    /// Send a frame to every session joined to `key`
    ///
    /// # Returns
    /// Number of sessions reached (0 for an unknown key)
    pub fn broadcast(&self, key: &str, event: ServerEvent) -> usize {
        self.broadcast_many(std::slice::from_ref(&key.to_string()), event)
    }

    /// Send a frame once to every session joined to any of `keys`
    pub fn broadcast_many(&self, keys: &[String], event: ServerEvent) -> usize {
        let inner = self.lock();

        let mut targets: HashSet<SessionId> = HashSet::new();
        for key in keys {
            if let Some(sessions) = inner.key_sessions.get(key) {
                targets.extend(sessions.iter().copied());
            }
        }

        let reached = targets
            .iter()
            .filter_map(|id| inner.senders.get(id))
            .filter(|tx| tx.send(event.clone()).is_ok())
            .count();

        tracing::debug!("[Realtime] Broadcast over {} keys reached {} sessions", keys.len(), reached);
        reached
    }

    /// Number of sessions joined to a key
    pub fn member_count(&self, key: &str) -> usize {
        self.lock().key_sessions.get(key).map(HashSet::len).unwrap_or(0)
    }

    /// Number of registered sessions
    pub fn session_count(&self) -> usize {
        self.lock().senders.len()
    }
}

fn remove_from_key(inner: &mut HubInner, key: &str, session_id: SessionId) {
    if let Some(sessions) = inner.key_sessions.get_mut(key) {
        sessions.remove(&session_id);
        if sessions.is_empty() {
            inner.key_sessions.remove(key);
        }
    }
}
