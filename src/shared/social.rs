//! Photo, comment and like types
//!
//! Photos are registered by URL; where the image bytes live is not this
//! crate's concern. Comments and likes hang off a photo and are owned by the
//! user who made them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::messaging::UserId;

/// Store-assigned photo id
pub type PhotoId = i64;
/// Store-assigned comment id
pub type CommentId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub user_id: UserId,
    pub url: String,
    pub description: String,
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub user_id: UserId,
    pub photo_id: PhotoId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Set once the author edits the comment
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request body of `POST /api/photos`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPhotoRequest {
    pub url: String,
    #[serde(default)]
    pub description: String,
}

impl NewPhotoRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.url.trim().is_empty() {
            return Err(SharedError::validation("url", "must not be empty"));
        }
        Ok(())
    }
}

/// Request body of `POST /api/comments`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCommentRequest {
    #[serde(default)]
    pub photo_id: PhotoId,
    #[serde(default)]
    pub content: String,
}

impl NewCommentRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.photo_id <= 0 {
            return Err(SharedError::validation("photo_id", "must be positive"));
        }
        validate_comment_content(&self.content)
    }
}

/// Request body of `PUT /api/comments/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

impl UpdateCommentRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        validate_comment_content(&self.content)
    }
}

fn validate_comment_content(content: &str) -> Result<(), SharedError> {
    if content.is_empty() {
        return Err(SharedError::validation("content", "must not be empty"));
    }
    Ok(())
}

/// Response of the create endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

/// Response of `GET /api/photos/{id}/likes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikesResponse {
    /// Users who liked the photo, in the order they did
    pub user_ids: Vec<UserId>,
    pub likes_count: i64,
}
