//! Authentication Handlers Module
//!
//! HTTP handlers for account and user-directory endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types
//! ├── signup.rs   - User registration handler
//! ├── login.rs    - User authentication handler
//! ├── me.rs       - Current user and profile edit
//! └── users.rs    - Public profiles, search and follow/unfollow
//! ```
//!
//! # Handlers
//!
//! - **`signup`** - POST /api/auth/signup
//! - **`login`** - POST /api/auth/login
//! - **`get_me`** - GET /api/auth/me
//! - **`update_me`** - PUT /api/users/me
//! - **`search_users`** - GET /api/users/search
//! - **`get_user`** - GET /api/users/{id}
//! - **`follow_user`** / **`unfollow_user`** - POST/DELETE /api/users/{id}/follow

/// Request and response types
pub mod types;

/// Signup handler
pub mod signup;

/// Login handler
pub mod login;

/// Current user handlers
pub mod me;

/// Profile, search and follow handlers
pub mod users;

pub use types::{SignupRequest, LoginRequest, AuthResponse, UserResponse, UpdateProfileRequest};

pub use signup::signup;
pub use login::login;
pub use me::{get_me, update_me};
pub use users::{get_user, search_users, follow_user, unfollow_user};
