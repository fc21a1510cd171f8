//! Shared Module
//!
//! This module contains the wire types shared by the HTTP API and the
//! realtime channel. Everything here is plain data: it serializes to the
//! JSON shapes clients see and carries no database or transport handles.
//!
//! # Overview
//!
//! - **`event`** - Realtime frames (`ClientEvent` inbound, `ServerEvent` outbound)
//! - **`presence`** - The online/offline status flag
//! - **`user`** - Public user projection (`UserSummary`)
//! - **`room`** - Room views and room request bodies
//! - **`message`** - Messenger, message and conversation views
//! - **`error`** - Validation errors shared by both surfaces
//! - **`config`** - Application configuration

/// Realtime event frames
pub mod event;

/// Presence status
pub mod presence;

/// Public user projection
pub mod user;

/// Room wire types
pub mod room;

/// Message wire types
pub mod message;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use event::{ClientEvent, ServerEvent, SendMessagePayload, StatusUpdate, ReceivedMessage, ErrorPayload};
pub use presence::UserStatus;
pub use user::UserSummary;
pub use room::{RoomView, RoomState, InviteLink};
pub use message::{Messenger, MessageView, ConversationSummary};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
