use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::interactions::Interactions;
use crate::models::{LikeStatusQuery, UserLikesQuery};

pub fn users_routes() -> Router<Interactions> {
    Router::new()
        .route("/{user_id}/likes", get(list_user_likes))
        .route("/{user_id}/likes/status", get(like_status))
}

async fn list_user_likes(
    State(interactions): State<Interactions>,
    Path(user_id): Path<i64>,
    Query(query): Query<UserLikesQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(10);

    let likes = interactions
        .list_user_likes(user_id, query.target_type, page, per_page)
        .await?;
    Ok(Json(likes))
}

async fn like_status(
    State(interactions): State<Interactions>,
    Path(user_id): Path<i64>,
    Query(query): Query<LikeStatusQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let liked = interactions
        .is_liked_by_user(user_id, query.target_type, query.target_id)
        .await?;
    Ok(Json(serde_json::json!({"liked": liked})))
}
