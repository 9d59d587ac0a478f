use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};

use crate::interactions::Interactions;
use crate::models::{CreatePhoto, LikeTarget, PhotoQuery};
use crate::routes::extract_actor;

pub fn photos_routes() -> Router<Interactions> {
    Router::new()
        .route("/", get(list_photos).post(create_photo))
        .route("/{photo_id}", get(get_photo).delete(delete_photo))
        .route("/{photo_id}/like", post(like_photo))
}

async fn list_photos(
    State(interactions): State<Interactions>,
    Query(query): Query<PhotoQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(10);

    let photos = interactions.list_photos(page, per_page).await?;
    Ok(Json(photos))
}

async fn get_photo(
    State(interactions): State<Interactions>,
    Path(photo_id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let photo = interactions.get_photo(photo_id).await?;
    Ok(Json(photo))
}

async fn create_photo(
    State(interactions): State<Interactions>,
    headers: HeaderMap,
    Json(input): Json<CreatePhoto>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let actor = extract_actor(&headers)?;
    let photo = interactions.create_photo(actor.id, &input).await?;
    Ok((StatusCode::CREATED, Json(photo)))
}

async fn delete_photo(
    State(interactions): State<Interactions>,
    headers: HeaderMap,
    Path(photo_id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let actor = extract_actor(&headers)?;
    interactions.delete_photo(photo_id, &actor).await?;
    Ok(Json(
        serde_json::json!({"message": "Photo deleted successfully"}),
    ))
}

async fn like_photo(
    State(interactions): State<Interactions>,
    headers: HeaderMap,
    Path(photo_id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let actor = extract_actor(&headers)?;
    let status = interactions
        .toggle_like(actor.id, LikeTarget::Photo, photo_id, None)
        .await?;
    Ok(Json(status))
}
