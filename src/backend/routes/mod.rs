//! Route Configuration Module
//!
//! - **`router`** - main router creation, tracing and CORS layers
//! - **`api_routes`** - `/api` endpoints behind the auth layer
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - API endpoint handlers
//! ```

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

pub use router::create_router;
