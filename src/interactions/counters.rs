use sqlx::{SqliteExecutor, SqlitePool};

use crate::models::LikeTarget;

/// Entity owning a denormalized counter.
#[derive(Debug, Clone, Copy)]
pub enum CounterTarget {
    Photo(i64),
    Comment(i64),
}

impl CounterTarget {
    pub fn for_like_target(target: LikeTarget, target_id: i64) -> Self {
        match target {
            LikeTarget::Photo => Self::Photo(target_id),
            LikeTarget::Comment => Self::Comment(target_id),
        }
    }

    fn table(self) -> &'static str {
        match self {
            Self::Photo(_) => "photos",
            Self::Comment(_) => "comments",
        }
    }

    fn id(self) -> i64 {
        match self {
            Self::Photo(id) | Self::Comment(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum CounterField {
    LikesCount,
    /// Photos only; comments carry no comment counter.
    CommentsCount,
}

impl CounterField {
    fn column(self) -> &'static str {
        match self {
            Self::LikesCount => "likes_count",
            Self::CommentsCount => "comments_count",
        }
    }
}

/// Applies a ±1 delta to a counter column as a single store-side update,
/// floored at zero. Never read-modify-write in application code, so
/// concurrent deltas from different requests cannot lose updates.
///
/// A missing target row is a warning, not an error: counter drift on an
/// entity that no longer exists is inconsequential.
pub async fn apply_delta<'e, E>(
    executor: E,
    target: CounterTarget,
    field: CounterField,
    delta: i64,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let column = field.column();
    let sql = format!(
        "UPDATE {} SET {column} = MAX({column} + ?, 0) WHERE id = ?",
        target.table()
    );

    let result = sqlx::query(&sql)
        .bind(delta)
        .bind(target.id())
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        tracing::warn!(
            table = target.table(),
            id = target.id(),
            column,
            delta,
            "counter delta targeted a missing entity; skipped"
        );
    }

    Ok(())
}

/// Recomputes a photo's denormalized counters from the detail rows.
/// Recovery tool for externally induced drift; normal operation keeps the
/// counters consistent transactionally and never needs this.
pub async fn reconcile_photo_counters(pool: &SqlitePool, photo_id: i64) -> Result<(), sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE photos SET
            comments_count = (
                SELECT COUNT(*) FROM comments
                WHERE photo_id = ? AND parent_comment_id IS NULL AND is_deleted = FALSE
            ),
            likes_count = (
                SELECT COUNT(*) FROM likes
                WHERE target_type = 'photo' AND target_id = ?
            )
        WHERE id = ?
        "#,
    )
    .bind(photo_id)
    .bind(photo_id)
    .bind(photo_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        tracing::warn!(photo_id, "counter reconciliation targeted a missing photo; skipped");
    }

    Ok(())
}
