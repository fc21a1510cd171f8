//! Socialhub - Main Library
//!
//! A realtime social messaging backend: user accounts and a follow graph,
//! invite-gated rooms, per-room ordered message history, and presence
//! fanned out over WebSockets.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types shared by the HTTP API and the realtime channel
//!   - Realtime frames, user/room/message views
//!   - Configuration and shared validation errors
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP API and WebSocket gateway
//!   - User directory, room registry, message store, presence tracker
//!   - SQLite persistence through sqlx
//!
//! # Example
//!
//! ```rust,no_run
//! use socialhub::backend::create_app;
//! use socialhub::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(config).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Wire types shared by HTTP and realtime surfaces
pub mod shared;

/// Server-side code
pub mod backend;
