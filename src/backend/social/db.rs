//! Database operations for photos, comments and likes
//!
//! Free functions over a `PgPool`, plus the [`PgSocialStore`] adapter.
//! Like changes and the photo's `likes_count` are written in one
//! transaction.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::store::{SocialError, SocialStore};
use crate::shared::messaging::UserId;
use crate::shared::social::{Comment, CommentId, Photo, PhotoId};

pub async fn insert_photo(
    pool: &PgPool,
    user_id: UserId,
    url: &str,
    description: &str,
) -> Result<PhotoId, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO photos (user_id, url, description)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(url)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(row.get("id"))
}

pub async fn get_photo(pool: &PgPool, photo_id: PhotoId) -> Result<Option<Photo>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, url, description, likes_count, created_at
        FROM photos
        WHERE id = $1
        "#,
    )
    .bind(photo_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| Photo {
        id: row.get("id"),
        user_id: row.get("user_id"),
        url: row.get("url"),
        description: row.get("description"),
        likes_count: row.get("likes_count"),
        created_at: row.get("created_at"),
    }))
}

/// Insert a comment, or `None` when the photo does not exist
pub async fn insert_comment(
    pool: &PgPool,
    user_id: UserId,
    photo_id: PhotoId,
    content: &str,
) -> Result<Option<CommentId>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO comments (user_id, photo_id, content)
        SELECT $1, $2, $3
        WHERE EXISTS (SELECT 1 FROM photos WHERE id = $2)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(photo_id)
    .bind(content)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| row.get("id")))
}

pub async fn get_comments(pool: &PgPool, photo_id: PhotoId) -> Result<Vec<Comment>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, photo_id, content, created_at, updated_at
        FROM comments
        WHERE photo_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(photo_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Comment {
            id: row.get("id"),
            user_id: row.get("user_id"),
            photo_id: row.get("photo_id"),
            content: row.get("content"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
        .collect())
}

/// Returns the number of rows changed
pub async fn update_comment(
    pool: &PgPool,
    comment_id: CommentId,
    user_id: UserId,
    content: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE comments
        SET content = $1, updated_at = NOW()
        WHERE id = $2 AND user_id = $3
        "#,
    )
    .bind(content)
    .bind(comment_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Returns the number of rows removed
pub async fn delete_comment(
    pool: &PgPool,
    comment_id: CommentId,
    user_id: UserId,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1 AND user_id = $2")
        .bind(comment_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Record a like and bump the counter. `Ok(false)` when the user already
/// liked the photo.
pub async fn insert_like(pool: &PgPool, photo_id: PhotoId, user_id: UserId) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO photo_likes (photo_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (photo_id, user_id) DO NOTHING
        "#,
    )
    .bind(photo_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if inserted == 0 {
        return Ok(false);
    }

    sqlx::query("UPDATE photos SET likes_count = likes_count + 1 WHERE id = $1")
        .bind(photo_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}

/// Remove a like and lower the counter. `Ok(false)` when there was none.
pub async fn delete_like(pool: &PgPool, photo_id: PhotoId, user_id: UserId) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM photo_likes WHERE photo_id = $1 AND user_id = $2")
        .bind(photo_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if removed == 0 {
        return Ok(false);
    }

    sqlx::query("UPDATE photos SET likes_count = likes_count - 1 WHERE id = $1")
        .bind(photo_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}

pub async fn get_likes(pool: &PgPool, photo_id: PhotoId) -> Result<Vec<UserId>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT user_id
        FROM photo_likes
        WHERE photo_id = $1
        ORDER BY created_at ASC, user_id ASC
        "#,
    )
    .bind(photo_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|row| row.get("user_id")).collect())
}

/// [`SocialStore`] backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgSocialStore {
    pool: PgPool,
}

impl PgSocialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn require_photo(&self, photo_id: PhotoId) -> Result<Photo, SocialError> {
        get_photo(&self.pool, photo_id)
            .await?
            .ok_or(SocialError::PhotoNotFound(photo_id))
    }
}

#[async_trait]
impl SocialStore for PgSocialStore {
    async fn create_photo(
        &self,
        user_id: UserId,
        url: &str,
        description: &str,
    ) -> Result<PhotoId, SocialError> {
        Ok(insert_photo(&self.pool, user_id, url, description).await?)
    }

    async fn get_photo(&self, photo_id: PhotoId) -> Result<Photo, SocialError> {
        self.require_photo(photo_id).await
    }

    async fn create_comment(
        &self,
        user_id: UserId,
        photo_id: PhotoId,
        content: &str,
    ) -> Result<CommentId, SocialError> {
        insert_comment(&self.pool, user_id, photo_id, content)
            .await?
            .ok_or(SocialError::PhotoNotFound(photo_id))
    }

    async fn list_comments(&self, photo_id: PhotoId) -> Result<Vec<Comment>, SocialError> {
        self.require_photo(photo_id).await?;
        Ok(get_comments(&self.pool, photo_id).await?)
    }

    async fn update_comment(
        &self,
        comment_id: CommentId,
        user_id: UserId,
        content: &str,
    ) -> Result<(), SocialError> {
        match update_comment(&self.pool, comment_id, user_id, content).await? {
            0 => Err(SocialError::CommentNotFound(comment_id)),
            _ => Ok(()),
        }
    }

    async fn delete_comment(&self, comment_id: CommentId, user_id: UserId) -> Result<(), SocialError> {
        match delete_comment(&self.pool, comment_id, user_id).await? {
            0 => Err(SocialError::CommentNotFound(comment_id)),
            _ => Ok(()),
        }
    }

    async fn add_like(&self, photo_id: PhotoId, user_id: UserId) -> Result<(), SocialError> {
        self.require_photo(photo_id).await?;
        if insert_like(&self.pool, photo_id, user_id).await? {
            Ok(())
        } else {
            Err(SocialError::AlreadyLiked)
        }
    }

    async fn remove_like(&self, photo_id: PhotoId, user_id: UserId) -> Result<(), SocialError> {
        if delete_like(&self.pool, photo_id, user_id).await? {
            Ok(())
        } else {
            Err(SocialError::LikeNotFound)
        }
    }

    async fn list_likes(&self, photo_id: PhotoId) -> Result<Vec<UserId>, SocialError> {
        self.require_photo(photo_id).await?;
        Ok(get_likes(&self.pool, photo_id).await?)
    }
}
