//! Message Store
//!
//! The durable, append-only log of messages per conversation. The realtime
//! hub only ever calls [`MessageStore::append`]; the REST layer uses the rest
//! of the trait for history retrieval and administration.
//!
//! Two implementations exist:
//!
//! - [`PgMessageStore`](super::db::PgMessageStore) - PostgreSQL through `sqlx`
//! - [`InMemoryMessageStore`](super::memory::InMemoryMessageStore) - used by
//!   tests and whenever no database is configured

use async_trait::async_trait;
use thiserror::Error;

use crate::shared::messaging::{ConversationId, Message, MessageId, UserId};

/// Errors returned by a [`MessageStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ConversationNotFound(_) | Self::MessageNotFound(_)
        )
    }
}

/// Persistence seam for conversations and messages
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist one message and return its store-assigned id.
    ///
    /// An unknown conversation id yields [`StoreError::ConversationNotFound`]
    /// and nothing is written.
    async fn append(
        &self,
        conversation_id: ConversationId,
        sender_id: UserId,
        content: &str,
    ) -> Result<MessageId, StoreError>;

    /// All messages of a conversation, oldest first (ties broken by id).
    async fn list_by_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, StoreError>;

    /// Id of the conversation for this ordered user pair, creating it if needed.
    async fn get_or_create_conversation(
        &self,
        user1_id: UserId,
        user2_id: UserId,
    ) -> Result<ConversationId, StoreError>;

    async fn delete_message(&self, message_id: MessageId) -> Result<(), StoreError>;
}
