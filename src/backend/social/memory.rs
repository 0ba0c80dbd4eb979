//! In-memory social store

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use super::store::{SocialError, SocialStore};
use crate::shared::messaging::UserId;
use crate::shared::social::{Comment, CommentId, Photo, PhotoId};

#[derive(Debug, Default)]
struct Tables {
    photos: BTreeMap<PhotoId, Photo>,
    comments: BTreeMap<CommentId, Comment>,
    /// Likers per photo, in like order
    likes: BTreeMap<PhotoId, Vec<UserId>>,
    next_photo_id: PhotoId,
    next_comment_id: CommentId,
}

impl Tables {
    fn photo_mut(&mut self, photo_id: PhotoId) -> Result<&mut Photo, SocialError> {
        self.photos
            .get_mut(&photo_id)
            .ok_or(SocialError::PhotoNotFound(photo_id))
    }

    fn own_comment_mut(
        &mut self,
        comment_id: CommentId,
        user_id: UserId,
    ) -> Result<&mut Comment, SocialError> {
        self.comments
            .get_mut(&comment_id)
            .filter(|comment| comment.user_id == user_id)
            .ok_or(SocialError::CommentNotFound(comment_id))
    }
}

/// [`SocialStore`] that keeps everything in process memory
#[derive(Debug, Default)]
pub struct InMemorySocialStore {
    tables: Mutex<Tables>,
}

impl InMemorySocialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SocialStore for InMemorySocialStore {
    async fn create_photo(
        &self,
        user_id: UserId,
        url: &str,
        description: &str,
    ) -> Result<PhotoId, SocialError> {
        let mut tables = self.lock();
        tables.next_photo_id += 1;
        let id = tables.next_photo_id;
        tables.photos.insert(
            id,
            Photo {
                id,
                user_id,
                url: url.to_string(),
                description: description.to_string(),
                likes_count: 0,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn get_photo(&self, photo_id: PhotoId) -> Result<Photo, SocialError> {
        self.lock()
            .photos
            .get(&photo_id)
            .cloned()
            .ok_or(SocialError::PhotoNotFound(photo_id))
    }

    async fn create_comment(
        &self,
        user_id: UserId,
        photo_id: PhotoId,
        content: &str,
    ) -> Result<CommentId, SocialError> {
        let mut tables = self.lock();
        tables.photo_mut(photo_id)?;

        tables.next_comment_id += 1;
        let id = tables.next_comment_id;
        tables.comments.insert(
            id,
            Comment {
                id,
                user_id,
                photo_id,
                content: content.to_string(),
                created_at: Utc::now(),
                updated_at: None,
            },
        );
        Ok(id)
    }

    async fn list_comments(&self, photo_id: PhotoId) -> Result<Vec<Comment>, SocialError> {
        let mut tables = self.lock();
        tables.photo_mut(photo_id)?;
        Ok(tables
            .comments
            .values()
            .filter(|comment| comment.photo_id == photo_id)
            .cloned()
            .collect())
    }

    async fn update_comment(
        &self,
        comment_id: CommentId,
        user_id: UserId,
        content: &str,
    ) -> Result<(), SocialError> {
        let mut tables = self.lock();
        let comment = tables.own_comment_mut(comment_id, user_id)?;
        comment.content = content.to_string();
        comment.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn delete_comment(&self, comment_id: CommentId, user_id: UserId) -> Result<(), SocialError> {
        let mut tables = self.lock();
        tables.own_comment_mut(comment_id, user_id)?;
        tables.comments.remove(&comment_id);
        Ok(())
    }

    async fn add_like(&self, photo_id: PhotoId, user_id: UserId) -> Result<(), SocialError> {
        let mut tables = self.lock();
        tables.photo_mut(photo_id)?;

        let likers = tables.likes.entry(photo_id).or_default();
        if likers.contains(&user_id) {
            return Err(SocialError::AlreadyLiked);
        }
        likers.push(user_id);
        tables.photo_mut(photo_id)?.likes_count += 1;
        Ok(())
    }

    async fn remove_like(&self, photo_id: PhotoId, user_id: UserId) -> Result<(), SocialError> {
        let mut tables = self.lock();
        let likers = tables.likes.get_mut(&photo_id).ok_or(SocialError::LikeNotFound)?;
        let position = likers
            .iter()
            .position(|liker| *liker == user_id)
            .ok_or(SocialError::LikeNotFound)?;
        likers.remove(position);
        tables.photo_mut(photo_id)?.likes_count -= 1;
        Ok(())
    }

    async fn list_likes(&self, photo_id: PhotoId) -> Result<Vec<UserId>, SocialError> {
        let mut tables = self.lock();
        tables.photo_mut(photo_id)?;
        Ok(tables.likes.get(&photo_id).cloned().unwrap_or_default())
    }
}
