//! Presence Module
//!
//! Tracks the online/offline flag of users and publishes every change to
//! the sessions of the user, its followers and the users it follows.
//!
//! - **`tracker`** - `PresenceTracker` and `PresenceTransition`
//! - **`handlers`** - `PATCH /api/users/{id}/status`

pub mod tracker;
pub mod handlers;

pub use tracker::{PresenceTracker, PresenceTransition};
