//! Photo, comment and like HTTP handlers
//!
//! All routes sit behind the auth middleware. The acting user always comes
//! from the access token, never from the request body or query.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::store::SocialStore;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::shared::social::{
    Comment, CommentId, CreatedResponse, LikesResponse, NewCommentRequest, NewPhotoRequest, Photo,
    PhotoId, UpdateCommentRequest,
};

fn positive(id: i64, what: &str) -> Result<i64, BackendError> {
    if id <= 0 {
        return Err(BackendError::bad_request(format!("Invalid {} ID", what)));
    }
    Ok(id)
}

/// `POST /api/photos`
pub async fn create_photo(
    State(store): State<Arc<dyn SocialStore>>,
    AuthUser(user): AuthUser,
    Json(request): Json<NewPhotoRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), BackendError> {
    request.validate()?;

    let id = store
        .create_photo(user.user_id, &request.url, &request.description)
        .await?;

    tracing::info!(photo_id = id, user_id = user.user_id, "Photo registered");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// `GET /api/photos/{photo_id}`
pub async fn get_photo(
    State(store): State<Arc<dyn SocialStore>>,
    Path(photo_id): Path<PhotoId>,
) -> Result<Json<Photo>, BackendError> {
    let photo = store.get_photo(positive(photo_id, "photo")?).await?;
    Ok(Json(photo))
}

/// `POST /api/comments`
pub async fn create_comment(
    State(store): State<Arc<dyn SocialStore>>,
    AuthUser(user): AuthUser,
    Json(request): Json<NewCommentRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), BackendError> {
    request.validate()?;

    let id = store
        .create_comment(user.user_id, request.photo_id, &request.content)
        .await?;

    tracing::info!(comment_id = id, photo_id = request.photo_id, user_id = user.user_id, "Comment created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// `GET /api/photos/{photo_id}/comments`
pub async fn get_comments(
    State(store): State<Arc<dyn SocialStore>>,
    Path(photo_id): Path<PhotoId>,
) -> Result<Json<Vec<Comment>>, BackendError> {
    let comments = store.list_comments(positive(photo_id, "photo")?).await?;
    tracing::debug!(photo_id, count = comments.len(), "Comments retrieved");
    Ok(Json(comments))
}

/// `PUT /api/comments/{comment_id}`
pub async fn update_comment(
    State(store): State<Arc<dyn SocialStore>>,
    AuthUser(user): AuthUser,
    Path(comment_id): Path<CommentId>,
    Json(request): Json<UpdateCommentRequest>,
) -> Result<StatusCode, BackendError> {
    request.validate()?;

    store
        .update_comment(positive(comment_id, "comment")?, user.user_id, &request.content)
        .await?;

    tracing::info!(comment_id, user_id = user.user_id, "Comment updated");
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/comments/{comment_id}`
pub async fn delete_comment(
    State(store): State<Arc<dyn SocialStore>>,
    AuthUser(user): AuthUser,
    Path(comment_id): Path<CommentId>,
) -> Result<StatusCode, BackendError> {
    store
        .delete_comment(positive(comment_id, "comment")?, user.user_id)
        .await?;

    tracing::info!(comment_id, user_id = user.user_id, "Comment deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/photos/{photo_id}/likes`
pub async fn add_like(
    State(store): State<Arc<dyn SocialStore>>,
    AuthUser(user): AuthUser,
    Path(photo_id): Path<PhotoId>,
) -> Result<StatusCode, BackendError> {
    store.add_like(positive(photo_id, "photo")?, user.user_id).await?;
    tracing::info!(photo_id, user_id = user.user_id, "Like added");
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/photos/{photo_id}/likes`
pub async fn remove_like(
    State(store): State<Arc<dyn SocialStore>>,
    AuthUser(user): AuthUser,
    Path(photo_id): Path<PhotoId>,
) -> Result<StatusCode, BackendError> {
    store.remove_like(positive(photo_id, "photo")?, user.user_id).await?;
    tracing::info!(photo_id, user_id = user.user_id, "Like removed");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/photos/{photo_id}/likes`
pub async fn get_likes(
    State(store): State<Arc<dyn SocialStore>>,
    Path(photo_id): Path<PhotoId>,
) -> Result<Json<LikesResponse>, BackendError> {
    let user_ids = store.list_likes(positive(photo_id, "photo")?).await?;
    Ok(Json(LikesResponse {
        likes_count: user_ids.len() as i64,
        user_ids,
    }))
}
