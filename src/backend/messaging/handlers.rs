//! Messaging HTTP Handlers
//!
//! The non-realtime path: conversation creation, persist-only sends, history
//! retrieval and deletion. All of them sit behind the auth middleware and
//! work against whichever [`MessageStore`] the server was built with.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::store::MessageStore;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::shared::messaging::{
    ConversationId, CreateConversationRequest, CreateConversationResponse, InboundFrame,
    ListMessagesResponse, MessageId, SendMessageResponse,
};
use crate::shared::SharedError;

/// `POST /api/conversations`
pub async fn create_conversation(
    State(store): State<Arc<dyn MessageStore>>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateConversationRequest>,
) -> Result<Json<CreateConversationResponse>, BackendError> {
    if request.user1_id == 0 {
        return Err(SharedError::validation("user1_id", "must be non-zero").into());
    }
    if request.user2_id == 0 {
        return Err(SharedError::validation("user2_id", "must be non-zero").into());
    }

    let conversation_id = store
        .get_or_create_conversation(request.user1_id, request.user2_id)
        .await?;

    tracing::info!(conversation_id, requested_by = user.user_id, "Conversation ready");
    Ok(Json(CreateConversationResponse { conversation_id }))
}

/// `POST /api/messages`
///
/// Persists only; connected realtime peers are not notified.
pub async fn send_message(
    State(store): State<Arc<dyn MessageStore>>,
    AuthUser(user): AuthUser,
    Json(frame): Json<InboundFrame>,
) -> Result<Json<SendMessageResponse>, BackendError> {
    frame.validate()?;

    let message_id = store
        .append(frame.conversation_id, frame.sender_id, &frame.content)
        .await?;

    tracing::info!(
        message_id,
        conversation_id = frame.conversation_id,
        requested_by = user.user_id,
        "Message sent"
    );
    Ok(Json(SendMessageResponse { message_id }))
}

/// `GET /api/conversations/{conversation_id}/messages`
pub async fn get_messages(
    State(store): State<Arc<dyn MessageStore>>,
    Path(conversation_id): Path<ConversationId>,
) -> Result<Json<ListMessagesResponse>, BackendError> {
    if conversation_id <= 0 {
        return Err(BackendError::bad_request("Invalid conversation ID"));
    }

    let messages = store.list_by_conversation(conversation_id).await?;
    tracing::debug!(conversation_id, count = messages.len(), "Messages retrieved");
    Ok(Json(ListMessagesResponse { messages }))
}

/// `DELETE /api/messages/{message_id}`
pub async fn delete_message(
    State(store): State<Arc<dyn MessageStore>>,
    AuthUser(user): AuthUser,
    Path(message_id): Path<MessageId>,
) -> Result<StatusCode, BackendError> {
    store.delete_message(message_id).await?;
    tracing::info!(message_id, requested_by = user.user_id, "Message deleted");
    Ok(StatusCode::NO_CONTENT)
}
