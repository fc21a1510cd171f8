//! Realtime Module
//!
//! One long-lived WebSocket per client. Each connection owns an explicit
//! `Session`; fan-out goes through a `BroadcastHub` keyed by broadcast key
//! (`user-{id}` or a room id).
//!
//! - **`broadcast`** - session registry and fan-out
//! - **`session`** - per-connection state
//! - **`gateway`** - inbound event dispatch
//! - **`ws`** - WebSocket upgrade and connection loop

pub mod broadcast;
pub mod session;
pub mod gateway;
pub mod ws;

pub use broadcast::{BroadcastHub, SessionId};
pub use gateway::Gateway;
pub use session::{Session, SessionState};
pub use ws::ws_handler;
