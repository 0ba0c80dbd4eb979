//! Routes Module
//!
//! # Architecture
//!
//! - **`router`** - top-level router, tracing layer, fallback
//! - **`realtime_routes`** - `/ws` and `/health`
//! - **`api_routes`** - `/api/auth/*`, `/api/conversations`, `/api/messages`

/// Main router creation
pub mod router;

/// Realtime handshake and health
pub mod realtime_routes;

/// API endpoint handlers
pub mod api_routes;

pub use router::create_router;
