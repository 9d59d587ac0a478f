use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Photo {
    pub id: i64,
    pub author_id: i64,
    pub image_url: String,
    pub caption: Option<String>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    pub id: i64,
    pub author_id: i64,
    pub image_url: String,
    pub caption: Option<String>,
    pub likes_count: i64,
    pub comments_count: i64,
    /// Users currently liking this photo, derived from the active like rows.
    pub likes: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

impl PhotoResponse {
    pub fn from_photo(photo: Photo, likes: Vec<i64>) -> Self {
        Self {
            id: photo.id,
            author_id: photo.author_id,
            image_url: photo.image_url,
            caption: photo.caption,
            likes_count: photo.likes_count,
            comments_count: photo.comments_count,
            likes,
            created_at: photo.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePhoto {
    pub image_url: String,
    pub caption: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PhotoListResponse {
    pub photos: Vec<Photo>,
    pub total: i64,
    pub page: i32,
    pub per_page: i32,
}

#[derive(Debug, Deserialize, Default)]
pub struct PhotoQuery {
    pub page: Option<i32>,
    pub per_page: Option<i32>,
}
