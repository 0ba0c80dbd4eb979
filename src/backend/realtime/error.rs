//! Realtime error types
//!
//! Per-frame failures ([`DispatchError`]) are reported back to the sending
//! peer as an [`ErrorNotice`] and never end the session. Per-peer delivery
//! failures ([`PushError`]) end only the session they belong to.

use thiserror::Error;

use crate::backend::messaging::store::StoreError;
use crate::shared::messaging::{ConversationId, ErrorNotice};
use crate::shared::SharedError;

/// Why an inbound frame did not produce a message
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Zero ids or empty content; the store was not called
    #[error("invalid frame: {0}")]
    InvalidFrame(SharedError),

    #[error("conversation {0} not found")]
    ConversationNotFound(ConversationId),

    /// Any store failure other than a missing conversation
    #[error("persistence failure: {0}")]
    PersistenceFailure(StoreError),
}

impl DispatchError {
    /// The notice sent to the originating peer
    pub fn notice(&self) -> ErrorNotice {
        match self {
            Self::InvalidFrame(_) => ErrorNotice::invalid_data(),
            Self::ConversationNotFound(_) => ErrorNotice::conversation_not_found(),
            Self::PersistenceFailure(_) => ErrorNotice::save_failed(),
        }
    }
}

impl From<StoreError> for DispatchError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConversationNotFound(id) => Self::ConversationNotFound(id),
            other => Self::PersistenceFailure(other),
        }
    }
}

/// A peer could not accept an outbound frame
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PushError {
    /// The connection was closed or its writer has gone away
    #[error("connection closed")]
    Closed,
    /// The outbound queue is at capacity
    #[error("outbound queue full")]
    Full,
}
