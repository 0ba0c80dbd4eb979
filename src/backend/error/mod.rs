//! Backend Error Module
//!
//! # Architecture
//!
//! - **`types`** - `BackendError` and its status/message mapping
//! - **`conversion`** - `IntoResponse`
//!
//! Realtime errors live in `backend::realtime::error` and store errors in
//! `backend::messaging::store`; both convert into `BackendError` where an
//! HTTP handler needs them.
//!
//! # Response Format
//!
//! ```json
//! { "error": "Conversation not found: 3", "status": 404 }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;
