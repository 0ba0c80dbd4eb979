//! Messaging Module
//!
//! Data structures for direct messaging:
//!
//! - `Message` - a persisted message in a conversation
//! - `Conversation` - a thread between two users
//! - `InboundFrame`, `BroadcastRecord`, `ErrorNotice` - realtime wire frames
//!
//! # Usage
//!
//! ```rust
//! use instaspace::shared::messaging::{InboundFrame, BroadcastRecord};
//!
//! let frame = InboundFrame::new(1, 42, "hello");
//! let record = BroadcastRecord::from_frame(7, frame);
//! assert_eq!(record.message_id, 7);
//! ```

pub mod conversation;
pub mod frame;
pub mod message;

/// Store-assigned message id
pub type MessageId = i64;
/// Store-assigned conversation id
pub type ConversationId = i64;
/// User id, as carried in frames and tokens
pub type UserId = i64;

pub use conversation::{Conversation, CreateConversationRequest, CreateConversationResponse};
pub use frame::{BroadcastRecord, ErrorNotice, InboundFrame};
pub use message::{ListMessagesResponse, Message, SendMessageResponse};
