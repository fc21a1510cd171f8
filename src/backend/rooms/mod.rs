//! Room Registry Module
//!
//! Invite-gated chat rooms: creator, membership set, optional password and
//! a single active invite token.
//!
//! # Module Structure
//!
//! ```text
//! rooms/
//! ├── mod.rs       - Module exports and documentation
//! ├── db.rs        - Queries over rooms and room_members
//! ├── registry.rs  - RoomRegistry: authorization and state rules
//! └── handlers.rs  - HTTP handlers
//! ```
//!
//! # Room State
//!
//! A room is `Open` until its first invite is minted and `Invitable`
//! afterwards. Minting again replaces the token, so only the latest invite
//! link works.

pub mod db;
pub mod registry;
pub mod handlers;

pub use registry::{RoomRegistry, mint_invite_token};
