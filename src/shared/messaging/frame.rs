//! Realtime Wire Frames
//!
//! The three JSON shapes that cross the `/ws` connection:
//!
//! - [`InboundFrame`] - what a peer sends: `{conversation_id, sender_id, content}`
//! - [`BroadcastRecord`] - what every peer receives after a frame is persisted:
//!   `{message_id, conversation_id, sender_id, content}`
//! - [`ErrorNotice`] - what only the originating peer receives when its frame
//!   is rejected: `{error}`
//!
//! Unknown inbound fields are ignored. Missing fields decode to zero / empty
//! and are then rejected by [`InboundFrame::validate`], so a frame with the
//! right shape but absent data is reported as invalid data, not as a format
//! error.

use serde::{Deserialize, Serialize};

use super::{ConversationId, MessageId, UserId};
use crate::shared::error::SharedError;

/// One inbound realtime payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundFrame {
    /// Conversation the message belongs to
    #[serde(default)]
    pub conversation_id: ConversationId,
    /// Author of the message, carried in-band
    #[serde(default)]
    pub sender_id: UserId,
    /// Message text
    #[serde(default)]
    pub content: String,
}

impl InboundFrame {
    pub fn new(conversation_id: ConversationId, sender_id: UserId, content: impl Into<String>) -> Self {
        Self {
            conversation_id,
            sender_id,
            content: content.into(),
        }
    }

    /// Decode a text frame. Fails only when the text is not a JSON object of
    /// the expected shape (wrong types, not an object, not JSON at all).
    pub fn parse(text: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reject frames that cannot produce a message: zero ids or empty content.
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.conversation_id == 0 {
            return Err(SharedError::validation("conversation_id", "must be non-zero"));
        }
        if self.sender_id == 0 {
            return Err(SharedError::validation("sender_id", "must be non-zero"));
        }
        if self.content.is_empty() {
            return Err(SharedError::validation("content", "must not be empty"));
        }
        Ok(())
    }
}

/// Outbound projection of a persisted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastRecord {
    pub message_id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub content: String,
}

impl BroadcastRecord {
    /// Build the record for a frame the store accepted under `message_id`
    pub fn from_frame(message_id: MessageId, frame: InboundFrame) -> Self {
        Self {
            message_id,
            conversation_id: frame.conversation_id,
            sender_id: frame.sender_id,
            content: frame.content,
        }
    }

    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Error notification sent to the connection whose frame was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub error: String,
}

impl ErrorNotice {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }

    /// The frame was not a JSON object of the expected shape
    pub fn invalid_format() -> Self {
        Self::new("Invalid message format")
    }

    /// The frame parsed but had zero ids or empty content
    pub fn invalid_data() -> Self {
        Self::new("Invalid message data")
    }

    pub fn conversation_not_found() -> Self {
        Self::new("Conversation not found")
    }

    /// Any store failure other than a missing conversation
    pub fn save_failed() -> Self {
        Self::new("Failed to save message")
    }

    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}
