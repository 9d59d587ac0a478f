use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{InteractionError, Result};
use crate::interactions::Actor;
use crate::models::{CreatePhoto, Photo, PhotoListResponse, PhotoResponse};

pub async fn create(pool: &SqlitePool, author_id: i64, input: &CreatePhoto) -> Result<Photo> {
    if input.image_url.trim().is_empty() {
        return Err(InteractionError::Validation(
            "Image URL is required".to_string(),
        ));
    }

    let now = Utc::now();
    let photo_id = sqlx::query(
        "INSERT INTO photos (author_id, image_url, caption, likes_count, comments_count, created_at) \
         VALUES (?, ?, ?, 0, 0, ?)",
    )
    .bind(author_id)
    .bind(input.image_url.trim())
    .bind(&input.caption)
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    let photo = sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = ?")
        .bind(photo_id)
        .fetch_one(pool)
        .await?;

    Ok(photo)
}

/// Photo with its current liker set, read from the active like rows so
/// the set and the counter share one source of truth.
pub async fn get(pool: &SqlitePool, photo_id: i64) -> Result<PhotoResponse> {
    let photo = sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = ?")
        .bind(photo_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| InteractionError::NotFound("Photo not found".to_string()))?;

    let likes: Vec<i64> = sqlx::query_scalar(
        "SELECT user_id FROM likes WHERE target_type = 'photo' AND target_id = ? \
         ORDER BY created_at ASC, id ASC",
    )
    .bind(photo_id)
    .fetch_all(pool)
    .await?;

    Ok(PhotoResponse::from_photo(photo, likes))
}

pub async fn list(pool: &SqlitePool, page: i32, per_page: i32) -> Result<PhotoListResponse> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let offset = (page - 1) * per_page;

    let photos = sqlx::query_as::<_, Photo>(
        "SELECT * FROM photos ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
    )
    .bind(per_page)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM photos")
        .fetch_one(pool)
        .await?;

    Ok(PhotoListResponse {
        photos,
        total,
        page,
        per_page,
    })
}

/// Hard delete, cascading to every comment, reply link, and like that
/// references the photo, inside one transaction. Comment likes are found
/// through their photo attribution.
pub async fn delete(pool: &SqlitePool, photo_id: i64, actor: &Actor) -> Result<()> {
    let mut tx = pool.begin().await?;

    let photo = sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = ?")
        .bind(photo_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| InteractionError::NotFound("Photo not found".to_string()))?;

    if photo.author_id != actor.id && !actor.is_admin {
        return Err(InteractionError::Authorization(
            "Not authorized to delete this photo".to_string(),
        ));
    }

    sqlx::query("DELETE FROM likes WHERE photo_id = ?")
        .bind(photo_id)
        .execute(&mut *tx)
        .await?;

    // Comments and reply links fall with the photo via the foreign keys.
    sqlx::query("DELETE FROM photos WHERE id = ?")
        .bind(photo_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}
