//! Authentication Module
//!
//! This module handles accounts, bearer tokens and the user directory
//! (profiles, presence flag and follow graph).
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model, status flag and follow graph storage
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Signup**: username, email, name and password → user created → token returned
//! 2. **Login**: username (or email) and password → credentials verified → token returned
//! 3. **Authenticated requests**: `Authorization: Bearer <token>` on every other route,
//!    or `?token=` on the realtime channel
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt with the configured cost
//! - Tokens are HS256 JWTs signed with `JWT_SECRET`
//! - Unknown users and wrong passwords are indistinguishable to the client

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::types::{SignupRequest, LoginRequest, AuthResponse, UserResponse, UpdateProfileRequest};
pub use handlers::{signup, login, get_me, update_me, get_user, search_users, follow_user, unfollow_user};
pub use users::User;
