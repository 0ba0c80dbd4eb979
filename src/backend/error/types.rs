/**
 * Backend Error Types
 *
 * This module defines the error type returned by HTTP handlers.
 * Every variant knows its status code and converts to a JSON response.
 *
 * # Error Types
 *
 * - `HandlerError` - request-level failures with an explicit status
 * - `Unavailable` - a dependency (the database) is not configured
 * - `Store` - message store failures
 * - `Social` - photo, comment and like store failures
 * - `SharedError` - validation and serialization errors from the shared module
 *
 * # Status Mapping
 *
 * | Variant                              | Status |
 * |--------------------------------------|--------|
 * | `HandlerError`                       | as set |
 * | `Unavailable`                        | 503    |
 * | `Store(ConversationNotFound)`        | 404    |
 * | `Store(MessageNotFound)`             | 404    |
 * | `Store(Database)`                    | 500    |
 * | `Social(*NotFound)`                  | 404    |
 * | `Social(AlreadyLiked)`               | 409    |
 * | `Social(Database)`                   | 500    |
 * | `SharedError(ValidationError)`       | 400    |
 * | `SharedError(SerializationError)`    | 500    |
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::messaging::store::StoreError;
use crate::backend::social::store::SocialError;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// ```rust
/// use instaspace::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., bad credentials, malformed request)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// A required backing service is not configured
    #[error("Service unavailable: {0}")]
    Unavailable(&'static str),

    /// Message store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Social store error
    #[error(transparent)]
    Social(#[from] SocialError),

    /// Shared error (from shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    /// Internal failure; the detail is logged, not returned to the caller
    pub fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        tracing::error!("{}: {}", context, err);
        Self::handler(StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(err) => match err {
                StoreError::ConversationNotFound(_) | StoreError::MessageNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Social(err) => match err {
                SocialError::PhotoNotFound(_)
                | SocialError::CommentNotFound(_)
                | SocialError::LikeNotFound => StatusCode::NOT_FOUND,
                SocialError::AlreadyLiked => StatusCode::CONFLICT,
                SocialError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::SharedError(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            },
        }
    }

    /// Get the error message
    ///
    /// Database details never leave the server.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Unavailable(what) => format!("{} not available", what),
            Self::Store(StoreError::Database(_)) => "Database error".to_string(),
            Self::Store(err) => err.to_string(),
            Self::Social(SocialError::Database(_)) => "Database error".to_string(),
            Self::Social(err) => err.to_string(),
            Self::SharedError(err) => err.to_string(),
        }
    }
}
