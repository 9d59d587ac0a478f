use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Shown in place of the content of a soft-deleted comment. The stored
/// content is never erased; deleted comments stay in the thread for
/// reply integrity.
pub const DELETED_CONTENT_PLACEHOLDER: &str = "[deleted]";

pub const COMMENT_MAX_LEN: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub photo_id: i64,
    pub author_id: i64,
    pub parent_comment_id: Option<i64>,
    pub content: String,
    pub likes_count: i64,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub photo_id: i64,
    pub author_id: i64,
    pub parent_comment_id: Option<i64>,
    pub content: String,
    pub likes_count: i64,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        let content = if comment.is_deleted {
            DELETED_CONTENT_PLACEHOLDER.to_string()
        } else {
            comment.content
        };
        Self {
            id: comment.id,
            photo_id: comment.photo_id,
            author_id: comment.author_id,
            parent_comment_id: comment.parent_comment_id,
            content,
            likes_count: comment.likes_count,
            is_edited: comment.is_edited,
            edited_at: comment.edited_at,
            is_deleted: comment.is_deleted,
            deleted_at: comment.deleted_at,
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub content: String,
    pub parent_comment_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct EditComment {
    pub content: String,
}
