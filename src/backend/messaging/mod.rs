//! Messaging Module
//!
//! Room-scoped message history: messengers, ordered appends and
//! direct-conversation listing.

pub mod db;
pub mod store;
pub mod handlers;

pub use store::{MessageStore, direct_room_id, parse_direct_room_id};
