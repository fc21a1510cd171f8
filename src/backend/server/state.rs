/**
 * Application State Management
 *
 * `AppState` is the central state container of the server. Every service
 * is cheap to clone (pools and `Arc`s inside), so the whole struct is
 * cloned into each request.
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers extract just the service they
 * need, e.g. `State(rooms): State<RoomRegistry>`.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::messaging::MessageStore;
use crate::backend::presence::PresenceTracker;
use crate::backend::realtime::{BroadcastHub, Gateway};
use crate::backend::rooms::RoomRegistry;
use crate::shared::AppConfig;

/// Application state shared by every handler
///
/// # Fields
///
/// * `config` - validated runtime configuration
/// * `db_pool` - SQLite connection pool
/// * `hub` - realtime session registry and fan-out
/// * `rooms`, `messages`, `presence` - domain services over the pool
/// * `gateway` - realtime event dispatch, sharing `hub`
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db_pool: SqlitePool,
    pub hub: BroadcastHub,
    pub rooms: RoomRegistry,
    pub messages: MessageStore,
    pub presence: PresenceTracker,
    pub gateway: Gateway,
}

impl AppState {
    /// Wire every service over one pool and one hub
    pub fn new(config: AppConfig, db_pool: SqlitePool) -> Self {
        let config = Arc::new(config);
        let hub = BroadcastHub::new();
        let rooms = RoomRegistry::new(db_pool.clone(), config.clone());
        let messages = MessageStore::new(db_pool.clone());
        let presence = PresenceTracker::new(db_pool.clone(), hub.clone());
        let gateway = Gateway::new(hub.clone(), presence.clone(), messages.clone());

        Self {
            config,
            db_pool,
            hub,
            rooms,
            messages,
            presence,
            gateway,
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for BroadcastHub {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hub.clone()
    }
}

impl FromRef<AppState> for RoomRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.rooms.clone()
    }
}

impl FromRef<AppState> for MessageStore {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.messages.clone()
    }
}

impl FromRef<AppState> for PresenceTracker {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.presence.clone()
    }
}

impl FromRef<AppState> for Gateway {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.gateway.clone()
    }
}
