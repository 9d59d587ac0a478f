use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// What a like points at. Stored as lowercase text in the likes table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LikeTarget {
    Photo,
    Comment,
}

impl LikeTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Comment => "comment",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Like {
    pub id: i64,
    pub user_id: i64,
    pub target_type: LikeTarget,
    pub target_id: i64,
    /// Containing photo, so likes on a comment can be attributed to the
    /// photo they appeared under. Always populated on insert.
    pub photo_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a toggle: the state the like ended up in, and the fresh
/// denormalized count on the target.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LikeStatus {
    pub liked: bool,
    pub likes_count: i64,
}

#[derive(Debug, Serialize)]
pub struct UserLikesResponse {
    pub likes: Vec<Like>,
    pub total: i64,
    pub page: i32,
    pub per_page: i32,
}

#[derive(Debug, Deserialize, Default)]
pub struct UserLikesQuery {
    pub target_type: Option<LikeTarget>,
    pub page: Option<i32>,
    pub per_page: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct LikeStatusQuery {
    pub target_type: LikeTarget,
    pub target_id: i64,
}
