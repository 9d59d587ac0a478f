use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{InteractionError, Result};
use crate::interactions::Actor;
use crate::interactions::counters::{self, CounterField, CounterTarget};
use crate::models::{COMMENT_MAX_LEN, Comment};

/// Validated input for a new comment. Content is re-checked here; the
/// boundary only guarantees shape, not business rules.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub photo_id: i64,
    pub author_id: i64,
    pub content: String,
    pub parent_comment_id: Option<i64>,
}

fn validate_content(content: &str) -> Result<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(InteractionError::Validation(
            "Comment content is required".to_string(),
        ));
    }
    if trimmed.chars().count() > COMMENT_MAX_LEN {
        return Err(InteractionError::Validation(format!(
            "Comment content must be at most {COMMENT_MAX_LEN} characters"
        )));
    }
    Ok(trimmed)
}

/// Inserts a comment. Top-level comments bump the photo's comments_count;
/// replies instead join their parent's reply set and leave the counter
/// alone, since only top-level comments are counted.
pub async fn create(pool: &SqlitePool, input: &NewComment) -> Result<Comment> {
    let content = validate_content(&input.content)?;

    let mut tx = pool.begin().await?;

    let photo_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM photos WHERE id = ?")
        .bind(input.photo_id)
        .fetch_optional(&mut *tx)
        .await?;
    if photo_exists.is_none() {
        return Err(InteractionError::NotFound("Photo not found".to_string()));
    }

    if let Some(parent_comment_id) = input.parent_comment_id {
        let parent: Option<(i64, i64)> =
            sqlx::query_as("SELECT id, photo_id FROM comments WHERE id = ?")
                .bind(parent_comment_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((_, parent_photo_id)) = parent else {
            return Err(InteractionError::NotFound(
                "Parent comment not found".to_string(),
            ));
        };
        if parent_photo_id != input.photo_id {
            return Err(InteractionError::NotFound(
                "Parent comment does not belong to this photo".to_string(),
            ));
        }
    }

    let now = Utc::now();
    let comment_id = sqlx::query(
        r#"
        INSERT INTO comments
            (photo_id, author_id, parent_comment_id, content, likes_count,
             is_edited, edited_at, is_deleted, deleted_at, created_at)
        VALUES (?, ?, ?, ?, 0, FALSE, NULL, FALSE, NULL, ?)
        "#,
    )
    .bind(input.photo_id)
    .bind(input.author_id)
    .bind(input.parent_comment_id)
    .bind(content)
    .bind(now)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    match input.parent_comment_id {
        Some(parent_comment_id) => {
            sqlx::query("INSERT OR IGNORE INTO comment_replies (parent_id, reply_id) VALUES (?, ?)")
                .bind(parent_comment_id)
                .bind(comment_id)
                .execute(&mut *tx)
                .await?;
        }
        None => {
            counters::apply_delta(
                &mut *tx,
                CounterTarget::Photo(input.photo_id),
                CounterField::CommentsCount,
                1,
            )
            .await?;
        }
    }

    let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?")
        .bind(comment_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(comment)
}

pub async fn edit(
    pool: &SqlitePool,
    comment_id: i64,
    new_content: &str,
    requester_id: i64,
) -> Result<Comment> {
    let mut tx = pool.begin().await?;

    let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?")
        .bind(comment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| InteractionError::NotFound("Comment not found".to_string()))?;

    if comment.author_id != requester_id {
        return Err(InteractionError::Authorization(
            "Not authorized to edit this comment".to_string(),
        ));
    }

    let content = validate_content(new_content)?;

    if comment.is_deleted {
        return Err(InteractionError::Conflict(
            "Cannot edit a deleted comment".to_string(),
        ));
    }

    let now = Utc::now();
    sqlx::query("UPDATE comments SET content = ?, is_edited = TRUE, edited_at = ? WHERE id = ?")
        .bind(content)
        .bind(now)
        .bind(comment_id)
        .execute(&mut *tx)
        .await?;

    let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?")
        .bind(comment_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(comment)
}

/// Soft delete with a one-level cascade over the reply set.
///
/// Everything runs in one transaction: cascade the linked replies, detach
/// from the parent's reply set if this comment is itself a reply, adjust
/// the photo counter if top-level, and flag the comment itself last. The
/// commit is the single point where the delete becomes observable; a
/// failure before it leaves the comment in its pre-delete state.
///
/// Deleting an already-deleted comment is a no-op, so retried requests
/// land harmlessly.
pub async fn delete(pool: &SqlitePool, comment_id: i64, actor: &Actor) -> Result<()> {
    let mut tx = pool.begin().await?;

    let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?")
        .bind(comment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| InteractionError::NotFound("Comment not found".to_string()))?;

    if comment.author_id != actor.id && !actor.is_admin {
        return Err(InteractionError::Authorization(
            "Not authorized to delete this comment".to_string(),
        ));
    }

    if comment.is_deleted {
        return Ok(());
    }

    let now = Utc::now();

    // Replies of replies were never counted, so nothing cascades past the
    // first level.
    sqlx::query(
        r#"
        UPDATE comments SET is_deleted = TRUE, deleted_at = ?
        WHERE id IN (SELECT reply_id FROM comment_replies WHERE parent_id = ?)
          AND is_deleted = FALSE
        "#,
    )
    .bind(now)
    .bind(comment_id)
    .execute(&mut *tx)
    .await?;

    if comment.parent_comment_id.is_some() {
        sqlx::query("DELETE FROM comment_replies WHERE reply_id = ?")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;
    } else {
        counters::apply_delta(
            &mut *tx,
            CounterTarget::Photo(comment.photo_id),
            CounterField::CommentsCount,
            -1,
        )
        .await?;
    }

    sqlx::query("UPDATE comments SET is_deleted = TRUE, deleted_at = ? WHERE id = ?")
        .bind(now)
        .bind(comment_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

pub async fn get(pool: &SqlitePool, comment_id: i64) -> Result<Comment> {
    sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?")
        .bind(comment_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| InteractionError::NotFound("Comment not found".to_string()))
}

/// All comments of a photo in thread order, deleted ones included so
/// reply chains stay intact. Redaction happens in the response mapping.
pub async fn list_for_photo(pool: &SqlitePool, photo_id: i64) -> Result<Vec<Comment>> {
    let photo_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM photos WHERE id = ?")
        .bind(photo_id)
        .fetch_optional(pool)
        .await?;
    if photo_exists.is_none() {
        return Err(InteractionError::NotFound("Photo not found".to_string()));
    }

    let comments = sqlx::query_as::<_, Comment>(
        "SELECT * FROM comments WHERE photo_id = ? ORDER BY created_at ASC, id ASC",
    )
    .bind(photo_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}
