//! In-memory message store
//!
//! A single mutex guards every table, so `append` is atomic and message ids
//! are handed out in the order appends reach the lock.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use super::store::{MessageStore, StoreError};
use crate::shared::messaging::{Conversation, ConversationId, Message, MessageId, UserId};

#[derive(Debug, Default)]
struct Tables {
    conversations: BTreeMap<ConversationId, Conversation>,
    messages: BTreeMap<MessageId, Message>,
    next_conversation_id: ConversationId,
    next_message_id: MessageId,
}

/// [`MessageStore`] that keeps everything in process memory
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    tables: Mutex<Tables>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with conversations `1..=count`, each between users
    /// `id` and `id + 1`
    pub fn with_conversations(count: usize) -> Self {
        let store = Self::new();
        {
            let mut tables = store.lock();
            for _ in 0..count {
                let id = tables.next_conversation_id + 1;
                tables.insert_conversation(id, id + 1);
            }
        }
        store
    }

    /// Number of persisted messages across all conversations
    pub fn message_count(&self) -> usize {
        self.lock().messages.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Tables {
    fn insert_conversation(&mut self, user1_id: UserId, user2_id: UserId) -> ConversationId {
        self.next_conversation_id += 1;
        let id = self.next_conversation_id;
        self.conversations.insert(
            id,
            Conversation {
                id,
                user1_id,
                user2_id,
                created_at: Utc::now(),
            },
        );
        id
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(
        &self,
        conversation_id: ConversationId,
        sender_id: UserId,
        content: &str,
    ) -> Result<MessageId, StoreError> {
        let mut tables = self.lock();
        if !tables.conversations.contains_key(&conversation_id) {
            return Err(StoreError::ConversationNotFound(conversation_id));
        }

        tables.next_message_id += 1;
        let id = tables.next_message_id;
        tables.messages.insert(
            id,
            Message {
                id,
                conversation_id,
                sender_id,
                content: content.to_string(),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn list_by_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, StoreError> {
        let tables = self.lock();
        if !tables.conversations.contains_key(&conversation_id) {
            return Err(StoreError::ConversationNotFound(conversation_id));
        }

        // BTreeMap iteration is already id order, which matches creation order
        Ok(tables
            .messages
            .values()
            .filter(|message| message.conversation_id == conversation_id)
            .cloned()
            .collect())
    }

    async fn get_or_create_conversation(
        &self,
        user1_id: UserId,
        user2_id: UserId,
    ) -> Result<ConversationId, StoreError> {
        let mut tables = self.lock();
        let existing = tables
            .conversations
            .values()
            .find(|c| c.user1_id == user1_id && c.user2_id == user2_id)
            .map(|c| c.id);

        Ok(match existing {
            Some(id) => id,
            None => tables.insert_conversation(user1_id, user2_id),
        })
    }

    async fn delete_message(&self, message_id: MessageId) -> Result<(), StoreError> {
        self.lock()
            .messages
            .remove(&message_id)
            .map(|_| ())
            .ok_or(StoreError::MessageNotFound(message_id))
    }
}
