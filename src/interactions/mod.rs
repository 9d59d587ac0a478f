//! The social-interaction consistency engine: keeps photos, comments, and
//! likes mutually consistent as likes are toggled and comments are
//! created, edited, and soft-deleted.
//!
//! Counter side effects are explicit method bodies here, never implicit
//! store callbacks, so control flow stays auditable and testable.

pub mod comments;
pub mod counters;
pub mod likes;
pub mod photos;

use sqlx::SqlitePool;

pub use comments::NewComment;

use crate::error::Result;
use crate::models::{
    Comment, CommentResponse, CreatePhoto, LikeStatus, LikeTarget, Photo, PhotoListResponse,
    PhotoResponse, UserLikesResponse,
};

/// The acting, already-authenticated user. Identity and role come from
/// the upstream auth collaborator; the engine only enforces ownership.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: i64,
    pub is_admin: bool,
}

/// Facade the route handlers call. Thin composition over the thread and
/// toggle managers; domain errors pass through untranslated.
#[derive(Clone)]
pub struct Interactions {
    pool: SqlitePool,
}

impl Interactions {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_photo(&self, author_id: i64, input: &CreatePhoto) -> Result<Photo> {
        photos::create(&self.pool, author_id, input).await
    }

    pub async fn get_photo(&self, photo_id: i64) -> Result<PhotoResponse> {
        photos::get(&self.pool, photo_id).await
    }

    pub async fn list_photos(&self, page: i32, per_page: i32) -> Result<PhotoListResponse> {
        photos::list(&self.pool, page, per_page).await
    }

    pub async fn delete_photo(&self, photo_id: i64, actor: &Actor) -> Result<()> {
        photos::delete(&self.pool, photo_id, actor).await
    }

    pub async fn create_comment(&self, input: &NewComment) -> Result<CommentResponse> {
        comments::create(&self.pool, input).await.map(Into::into)
    }

    pub async fn get_comment(&self, comment_id: i64) -> Result<Comment> {
        comments::get(&self.pool, comment_id).await
    }

    pub async fn list_comments(&self, photo_id: i64) -> Result<Vec<CommentResponse>> {
        let comments = comments::list_for_photo(&self.pool, photo_id).await?;
        Ok(comments.into_iter().map(Into::into).collect())
    }

    pub async fn edit_comment(
        &self,
        comment_id: i64,
        new_content: &str,
        requester_id: i64,
    ) -> Result<CommentResponse> {
        comments::edit(&self.pool, comment_id, new_content, requester_id)
            .await
            .map(Into::into)
    }

    pub async fn delete_comment(&self, comment_id: i64, actor: &Actor) -> Result<()> {
        comments::delete(&self.pool, comment_id, actor).await
    }

    pub async fn toggle_like(
        &self,
        user_id: i64,
        target: LikeTarget,
        target_id: i64,
        photo_id: Option<i64>,
    ) -> Result<LikeStatus> {
        likes::toggle(&self.pool, user_id, target, target_id, photo_id).await
    }

    pub async fn is_liked_by_user(
        &self,
        user_id: i64,
        target: LikeTarget,
        target_id: i64,
    ) -> Result<bool> {
        likes::is_liked_by_user(&self.pool, user_id, target, target_id).await
    }

    pub async fn list_user_likes(
        &self,
        user_id: i64,
        target: Option<LikeTarget>,
        page: i32,
        per_page: i32,
    ) -> Result<UserLikesResponse> {
        likes::list_user_likes(&self.pool, user_id, target, page, per_page).await
    }
}
