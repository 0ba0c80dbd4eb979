//! Server Module
//!
//! Startup wiring: configuration of the optional database, the shared
//! application state, and router assembly.
//!
//! # Architecture
//!
//! - **`state`** - `AppState` and its `FromRef` projections
//! - **`config`** - PostgreSQL pool and migrations
//! - **`init`** - builds state and router

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use init::{build_state, create_app, in_memory_state};
pub use state::AppState;
