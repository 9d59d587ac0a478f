use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{InteractionError, Result};
use crate::interactions::counters::{self, CounterField, CounterTarget};
use crate::models::{Like, LikeStatus, LikeTarget, UserLikesResponse};

/// Result of attempting to insert a like row. The store's unique index on
/// (user_id, target_type, target_id) turns a racing duplicate insert into
/// `AlreadyExists` instead of a second row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

pub(crate) async fn insert_like(
    conn: &mut SqliteConnection,
    user_id: i64,
    target: LikeTarget,
    target_id: i64,
    photo_id: i64,
    created_at: DateTime<Utc>,
) -> Result<InsertOutcome> {
    let result = sqlx::query(
        r#"
        INSERT INTO likes (user_id, target_type, target_id, photo_id, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(target)
    .bind(target_id)
    .bind(photo_id)
    .bind(created_at)
    .execute(conn)
    .await;

    match result {
        Ok(_) => Ok(InsertOutcome::Inserted),
        Err(e)
            if e.as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation()) =>
        {
            Ok(InsertOutcome::AlreadyExists)
        }
        Err(e) => Err(e.into()),
    }
}

/// Resolves the like target to its containing photo, erroring if the
/// target no longer exists.
async fn resolve_target_photo(
    conn: &mut SqliteConnection,
    target: LikeTarget,
    target_id: i64,
) -> Result<i64> {
    match target {
        LikeTarget::Photo => {
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM photos WHERE id = ?")
                .bind(target_id)
                .fetch_optional(conn)
                .await?;
            exists.ok_or_else(|| InteractionError::NotFound("Photo not found".to_string()))
        }
        LikeTarget::Comment => {
            let resolved: Option<i64> =
                sqlx::query_scalar("SELECT photo_id FROM comments WHERE id = ?")
                    .bind(target_id)
                    .fetch_optional(conn)
                    .await?;
            resolved.ok_or_else(|| InteractionError::NotFound("Comment not found".to_string()))
        }
    }
}

async fn target_likes_count(
    conn: &mut SqliteConnection,
    target: LikeTarget,
    target_id: i64,
) -> Result<i64> {
    let table = match target {
        LikeTarget::Photo => "photos",
        LikeTarget::Comment => "comments",
    };
    let count: Option<i64> =
        sqlx::query_scalar(&format!("SELECT likes_count FROM {table} WHERE id = ?"))
            .bind(target_id)
            .fetch_optional(conn)
            .await?;
    Ok(count.unwrap_or(0))
}

/// Creates the like if absent, removes it if present, keeping the target's
/// likes_count in step within the same transaction.
///
/// Races with a duplicate request from the same user resolve through the
/// store: a losing insert reports "already liked" without a second bump,
/// and a removal of an already-gone row skips the decrement.
pub async fn toggle(
    pool: &SqlitePool,
    user_id: i64,
    target: LikeTarget,
    target_id: i64,
    photo_id: Option<i64>,
) -> Result<LikeStatus> {
    let mut tx = pool.begin().await?;

    let attributed_photo_id = resolve_target_photo(&mut tx, target, target_id).await?;
    // The caller-supplied attribution is advisory; the store is
    // authoritative for which photo a comment belongs to.
    if let Some(supplied) = photo_id
        && supplied != attributed_photo_id
    {
        tracing::warn!(
            supplied,
            resolved = attributed_photo_id,
            "supplied photo attribution disagrees with the store; using the store"
        );
    }

    let existing: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM likes WHERE user_id = ? AND target_type = ? AND target_id = ?",
    )
    .bind(user_id)
    .bind(target)
    .bind(target_id)
    .fetch_optional(&mut *tx)
    .await?;

    let liked = match existing {
        Some(like_id) => {
            let removed = sqlx::query("DELETE FROM likes WHERE id = ?")
                .bind(like_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            if removed > 0 {
                counters::apply_delta(
                    &mut *tx,
                    CounterTarget::for_like_target(target, target_id),
                    CounterField::LikesCount,
                    -1,
                )
                .await?;
            }
            false
        }
        None => {
            let outcome = insert_like(
                &mut tx,
                user_id,
                target,
                target_id,
                attributed_photo_id,
                Utc::now(),
            )
            .await?;
            if outcome == InsertOutcome::Inserted {
                counters::apply_delta(
                    &mut *tx,
                    CounterTarget::for_like_target(target, target_id),
                    CounterField::LikesCount,
                    1,
                )
                .await?;
            }
            true
        }
    };

    let likes_count = target_likes_count(&mut tx, target, target_id).await?;

    tx.commit().await?;

    Ok(LikeStatus { liked, likes_count })
}

pub async fn is_liked_by_user(
    pool: &SqlitePool,
    user_id: i64,
    target: LikeTarget,
    target_id: i64,
) -> Result<bool> {
    let liked: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = ? AND target_type = ? AND target_id = ?)",
    )
    .bind(user_id)
    .bind(target)
    .bind(target_id)
    .fetch_one(pool)
    .await?;

    Ok(liked)
}

/// A user's likes, newest first, optionally filtered by target kind.
pub async fn list_user_likes(
    pool: &SqlitePool,
    user_id: i64,
    target: Option<LikeTarget>,
    page: i32,
    per_page: i32,
) -> Result<UserLikesResponse> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let offset = (page - 1) * per_page;

    let (likes, total): (Vec<Like>, i64) = if let Some(target) = target {
        let likes = sqlx::query_as::<_, Like>(
            "SELECT * FROM likes WHERE user_id = ? AND target_type = ? \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(target)
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE user_id = ? AND target_type = ?")
                .bind(user_id)
                .bind(target)
                .fetch_one(pool)
                .await?;

        (likes, count)
    } else {
        let likes = sqlx::query_as::<_, Like>(
            "SELECT * FROM likes WHERE user_id = ? \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        (likes, count)
    };

    Ok(UserLikesResponse {
        likes,
        total,
        page,
        per_page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn seed_photo(pool: &SqlitePool) -> i64 {
        sqlx::query("INSERT INTO photos (author_id, image_url, created_at) VALUES (1, 'u', ?)")
            .bind(Utc::now())
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    async fn seed_comment(pool: &SqlitePool, photo_id: i64) -> i64 {
        sqlx::query(
            "INSERT INTO comments (photo_id, author_id, content, created_at) VALUES (?, 2, 'c', ?)",
        )
        .bind(photo_id)
        .bind(Utc::now())
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
    }

    async fn photo_likes_count(pool: &SqlitePool, photo_id: i64) -> i64 {
        sqlx::query_scalar("SELECT likes_count FROM photos WHERE id = ?")
            .bind(photo_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn toggle_twice_returns_to_the_original_state() {
        let pool = db::init_memory_db().await.unwrap();
        let photo_id = seed_photo(&pool).await;

        let on = toggle(&pool, 7, LikeTarget::Photo, photo_id, None).await.unwrap();
        assert!(on.liked);
        assert_eq!(on.likes_count, 1);
        assert!(is_liked_by_user(&pool, 7, LikeTarget::Photo, photo_id).await.unwrap());

        let off = toggle(&pool, 7, LikeTarget::Photo, photo_id, None).await.unwrap();
        assert!(!off.liked);
        assert_eq!(off.likes_count, 0);
        assert!(!is_liked_by_user(&pool, 7, LikeTarget::Photo, photo_id).await.unwrap());
        assert_eq!(photo_likes_count(&pool, photo_id).await, 0);
    }

    #[tokio::test]
    async fn likes_from_different_users_accumulate() {
        let pool = db::init_memory_db().await.unwrap();
        let photo_id = seed_photo(&pool).await;

        toggle(&pool, 7, LikeTarget::Photo, photo_id, None).await.unwrap();
        let second = toggle(&pool, 8, LikeTarget::Photo, photo_id, None).await.unwrap();

        assert!(second.liked);
        assert_eq!(second.likes_count, 2);
    }

    #[tokio::test]
    async fn comment_like_is_attributed_to_the_containing_photo() {
        let pool = db::init_memory_db().await.unwrap();
        let photo_id = seed_photo(&pool).await;
        let comment_id = seed_comment(&pool, photo_id).await;

        // No photo id supplied; the store resolves the attribution.
        let status = toggle(&pool, 7, LikeTarget::Comment, comment_id, None).await.unwrap();
        assert!(status.liked);
        assert_eq!(status.likes_count, 1);

        let like = sqlx::query_as::<_, Like>("SELECT * FROM likes WHERE user_id = 7")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(like.target_type, LikeTarget::Comment);
        assert_eq!(like.target_id, comment_id);
        assert_eq!(like.photo_id, Some(photo_id));

        // The photo's own counter is untouched by comment likes.
        assert_eq!(photo_likes_count(&pool, photo_id).await, 0);
    }

    #[tokio::test]
    async fn toggle_on_missing_target_is_not_found() {
        let pool = db::init_memory_db().await.unwrap();

        let err = toggle(&pool, 7, LikeTarget::Photo, 9999, None).await.unwrap_err();
        assert!(matches!(err, InteractionError::NotFound(_)));

        let err = toggle(&pool, 7, LikeTarget::Comment, 9999, None).await.unwrap_err();
        assert!(matches!(err, InteractionError::NotFound(_)));
    }

    #[tokio::test]
    async fn duplicate_insert_resolves_to_already_exists() {
        let pool = db::init_memory_db().await.unwrap();
        let photo_id = seed_photo(&pool).await;
        let now = Utc::now();

        let mut conn = pool.acquire().await.unwrap();
        let first = insert_like(&mut conn, 7, LikeTarget::Photo, photo_id, photo_id, now)
            .await
            .unwrap();
        assert_eq!(first, InsertOutcome::Inserted);

        // The losing side of a concurrent duplicate toggle lands here: the
        // unique index rejects the row and the outcome is "already liked".
        let second = insert_like(&mut conn, 7, LikeTarget::Photo, photo_id, photo_id, now)
            .await
            .unwrap();
        assert_eq!(second, InsertOutcome::AlreadyExists);
        drop(conn);

        let rows: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM likes WHERE user_id = 7 AND target_type = 'photo' AND target_id = ?",
        )
        .bind(photo_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn user_likes_are_listed_newest_first_with_filter_and_pages() {
        let pool = db::init_memory_db().await.unwrap();
        let photo_a = seed_photo(&pool).await;
        let photo_b = seed_photo(&pool).await;
        let comment_id = seed_comment(&pool, photo_a).await;

        toggle(&pool, 7, LikeTarget::Photo, photo_a, None).await.unwrap();
        toggle(&pool, 7, LikeTarget::Photo, photo_b, None).await.unwrap();
        toggle(&pool, 7, LikeTarget::Comment, comment_id, None).await.unwrap();

        let all = list_user_likes(&pool, 7, None, 1, 10).await.unwrap();
        assert_eq!(all.total, 3);
        // Insertion order ascending, so listing is the reverse.
        assert_eq!(all.likes[0].target_type, LikeTarget::Comment);
        assert_eq!(all.likes[2].target_id, photo_a);

        let photos_only = list_user_likes(&pool, 7, Some(LikeTarget::Photo), 1, 10)
            .await
            .unwrap();
        assert_eq!(photos_only.total, 2);
        assert!(photos_only.likes.iter().all(|l| l.target_type == LikeTarget::Photo));

        let page_two = list_user_likes(&pool, 7, None, 2, 2).await.unwrap();
        assert_eq!(page_two.total, 3);
        assert_eq!(page_two.likes.len(), 1);
        assert_eq!(page_two.likes[0].target_id, photo_a);
    }
}
