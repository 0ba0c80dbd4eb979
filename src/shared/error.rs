//! Shared Error Types
//!
//! Errors raised while decoding or validating the wire types in
//! [`crate::shared::messaging`]. They carry no transport or database context
//! so they can be produced anywhere a frame or request body is inspected.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON that does not have the expected shape
//! - `ValidationError` - well-formed data that breaks a field rule
//!
//! # Usage
//!
//! ```rust
//! use instaspace::shared::error::SharedError;
//!
//! let error = SharedError::validation("content", "must not be empty");
//! assert!(error.is_validation());
//! ```
use thiserror::Error;

/// Errors produced by shared wire types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// A field holds a value the receiver refuses to act on
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The offending field
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for errors caused by a field rule rather than malformed JSON
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
