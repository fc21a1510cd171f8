//! Common test utilities and helpers
//!
//! - Database fixtures (in-memory SQLite with migrations applied)
//! - Authentication helpers (users, tokens, follow edges)
//! - Realtime helpers (draining session queues)
//! - Custom assertion macros

#![allow(dead_code)]

#[macro_use]
pub mod assertions;
pub mod auth_helpers;
pub mod database;
pub mod realtime;

pub use auth_helpers::*;
pub use database::*;
pub use realtime::*;
