//! Server Module
//!
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`config`** - database connection and migrations
//! - **`init`** - app creation
//!
//! # Initialization Flow
//!
//! 1. **Configuration**: `AppConfig::from_env()` in `main`
//! 2. **Storage**: SQLite pool plus embedded migrations
//! 3. **State Creation**: services wired over one pool and one broadcast hub
//! 4. **Router Creation**: routes, auth layer, tracing and CORS

/// Application state management
pub mod state;

/// Database setup
pub mod config;

/// Server initialization
pub mod init;

pub use config::connect_database;
pub use init::create_app;
pub use state::AppState;
