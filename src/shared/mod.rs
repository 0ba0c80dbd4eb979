//! Shared Module
//!
//! Types shared by the server and by anything that talks to it: the
//! realtime wire frames, persisted message and conversation shapes, photos
//! with their comments and likes, the configuration, and the errors raised
//! while decoding them.
//!
//! Nothing here depends on axum or sqlx, so this module compiles without
//! the `ssr` feature.

/// Application configuration
pub mod config;

/// Shared error types
pub mod error;

/// Messaging data structures and realtime frames
pub mod messaging;

/// Photos, comments and likes
pub mod social;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use messaging::{BroadcastRecord, ErrorNotice, InboundFrame, Message};
