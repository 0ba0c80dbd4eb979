//! Social Store
//!
//! Persistence for photos and the comments and likes attached to them.
//! Mirrors [`MessageStore`](crate::backend::messaging::MessageStore): a
//! PostgreSQL implementation and an in-memory one for tests and for running
//! without a database.

use async_trait::async_trait;
use thiserror::Error;

use crate::shared::messaging::UserId;
use crate::shared::social::{Comment, CommentId, Photo, PhotoId};

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("Photo not found: {0}")]
    PhotoNotFound(PhotoId),

    /// Missing, or not written by the acting user
    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    #[error("Like not found")]
    LikeNotFound,

    #[error("Photo already liked")]
    AlreadyLiked,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait SocialStore: Send + Sync {
    async fn create_photo(
        &self,
        user_id: UserId,
        url: &str,
        description: &str,
    ) -> Result<PhotoId, SocialError>;

    async fn get_photo(&self, photo_id: PhotoId) -> Result<Photo, SocialError>;

    /// [`SocialError::PhotoNotFound`] when the photo does not exist
    async fn create_comment(
        &self,
        user_id: UserId,
        photo_id: PhotoId,
        content: &str,
    ) -> Result<CommentId, SocialError>;

    /// Comments of a photo, oldest first
    async fn list_comments(&self, photo_id: PhotoId) -> Result<Vec<Comment>, SocialError>;

    /// Only the author may edit; anyone else gets `CommentNotFound`
    async fn update_comment(
        &self,
        comment_id: CommentId,
        user_id: UserId,
        content: &str,
    ) -> Result<(), SocialError>;

    /// Only the author may delete; anyone else gets `CommentNotFound`
    async fn delete_comment(&self, comment_id: CommentId, user_id: UserId) -> Result<(), SocialError>;

    /// One like per user and photo; the photo's counter moves with it
    async fn add_like(&self, photo_id: PhotoId, user_id: UserId) -> Result<(), SocialError>;

    async fn remove_like(&self, photo_id: PhotoId, user_id: UserId) -> Result<(), SocialError>;

    /// Users who liked the photo, in like order
    async fn list_likes(&self, photo_id: PhotoId) -> Result<Vec<UserId>, SocialError>;
}
