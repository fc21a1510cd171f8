//! Middleware Module
//!
//! HTTP middleware applied before requests reach handlers.
//!
//! - **`auth`** - Bearer-token authentication for protected routes
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//! use socialhub::backend::middleware::auth_middleware;
//!
//! let protected = router.route_layer(from_fn_with_state(app_state.clone(), auth_middleware));
//! ```

pub mod auth;

pub use auth::{AuthenticatedUser, AuthUser, auth_middleware, authenticate, bearer_token};
