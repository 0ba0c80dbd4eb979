//! Database operations for messaging
//!
//! Free functions over a `PgPool`, one statement each, plus the
//! [`PgMessageStore`] adapter that exposes them as a [`MessageStore`].
//! Tables are created by the migrations under `migrations/`.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::store::{MessageStore, StoreError};
use crate::shared::messaging::{ConversationId, Message, MessageId, UserId};

/// True if a conversation with this id exists
pub async fn conversation_exists(
    pool: &PgPool,
    conversation_id: ConversationId,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM conversations WHERE id = $1) AS present")
        .bind(conversation_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get("present"))
}

/// Insert or fetch the conversation for an ordered user pair
pub async fn upsert_conversation(
    pool: &PgPool,
    user1_id: UserId,
    user2_id: UserId,
) -> Result<ConversationId, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO conversations (user1_id, user2_id)
        VALUES ($1, $2)
        ON CONFLICT (user1_id, user2_id)
        DO UPDATE SET user1_id = EXCLUDED.user1_id
        RETURNING id
        "#,
    )
    .bind(user1_id)
    .bind(user2_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get("id"))
}

/// Insert a message row and return its id, or `None` when the conversation
/// does not exist. The existence check and the insert are one statement.
pub async fn insert_message(
    pool: &PgPool,
    conversation_id: ConversationId,
    sender_id: UserId,
    content: &str,
) -> Result<Option<MessageId>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO messages (conversation_id, sender_id, content)
        SELECT $1, $2, $3
        WHERE EXISTS (SELECT 1 FROM conversations WHERE id = $1)
        RETURNING id
        "#,
    )
    .bind(conversation_id)
    .bind(sender_id)
    .bind(content)
    .fetch_optional(pool)
    .await;

    match row {
        Ok(row) => Ok(row.map(|row| row.get("id"))),
        // Conversation deleted between the EXISTS check and the FK check
        Err(e) if is_foreign_key_violation(&e) => Ok(None),
        Err(e) => Err(e),
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation())
}

/// Get the messages of a conversation, oldest first
pub async fn get_messages(
    pool: &PgPool,
    conversation_id: ConversationId,
) -> Result<Vec<Message>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, conversation_id, sender_id, content, created_at
        FROM messages
        WHERE conversation_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Message {
            id: row.get("id"),
            conversation_id: row.get("conversation_id"),
            sender_id: row.get("sender_id"),
            content: row.get("content"),
            created_at: row.get("created_at"),
        })
        .collect())
}

/// Delete a message; returns the number of rows removed
pub async fn delete_message(pool: &PgPool, message_id: MessageId) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM messages WHERE id = $1")
        .bind(message_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// [`MessageStore`] backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn append(
        &self,
        conversation_id: ConversationId,
        sender_id: UserId,
        content: &str,
    ) -> Result<MessageId, StoreError> {
        insert_message(&self.pool, conversation_id, sender_id, content)
            .await?
            .ok_or(StoreError::ConversationNotFound(conversation_id))
    }

    async fn list_by_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, StoreError> {
        if !conversation_exists(&self.pool, conversation_id).await? {
            return Err(StoreError::ConversationNotFound(conversation_id));
        }
        Ok(get_messages(&self.pool, conversation_id).await?)
    }

    async fn get_or_create_conversation(
        &self,
        user1_id: UserId,
        user2_id: UserId,
    ) -> Result<ConversationId, StoreError> {
        Ok(upsert_conversation(&self.pool, user1_id, user2_id).await?)
    }

    async fn delete_message(&self, message_id: MessageId) -> Result<(), StoreError> {
        match delete_message(&self.pool, message_id).await? {
            0 => Err(StoreError::MessageNotFound(message_id)),
            _ => Ok(()),
        }
    }
}
