//! Backend Module
//!
//! Server-side code: the HTTP API, the realtime gateway and the domain
//! services behind them.
//!
//! # Architecture
//!
//! - **`auth`** - User directory: accounts, tokens, follow graph
//! - **`rooms`** - Room registry: invite-gated membership
//! - **`messaging`** - Message store: per-room ordered history
//! - **`presence`** - Presence tracker: online/offline transitions
//! - **`realtime`** - WebSocket sessions, broadcast hub, event dispatch
//! - **`middleware`** - Bearer token authentication
//! - **`error`** - `BackendError` and the JSON response envelope
//! - **`routes`** - Router assembly
//! - **`server`** - `AppState`, database setup, app creation
//!
//! # Request Flow
//!
//! ```text
//! HTTP request ──► auth_middleware ──► handler ──► service ──► SQLite
//!                                                     │
//! WebSocket frame ──► Gateway ──► service ────────────┤
//!                        │                            ▼
//!                        └──────────────► BroadcastHub ──► sessions
//! ```

/// Server initialization and state
pub mod server;

/// Router assembly
pub mod routes;

/// Realtime sessions and fan-out
pub mod realtime;

/// Error types
pub mod error;

/// User directory
pub mod auth;

/// Authentication middleware
pub mod middleware;

/// Room registry
pub mod rooms;

/// Message store
pub mod messaging;

/// Presence tracker
pub mod presence;

pub use error::BackendError;
pub use server::{create_app, AppState};
