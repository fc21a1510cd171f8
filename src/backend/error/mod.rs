//! Backend Error Module
//!
//! This module defines the error type shared by the stores, the HTTP
//! handlers and the realtime gateway.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse and the success envelope
//! ```
//!
//! # HTTP Response Conversion
//!
//! `BackendError` implements `IntoResponse`, so handlers return
//! `Result<ApiResponse<T>, BackendError>` and errors become
//! `{"success": false, "message": ...}` with the mapped status code.
//! The realtime gateway turns the same errors into `error` frames.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
pub use conversion::{ApiResponse, PagedResponse, Pagination};
