use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
};

use crate::interactions::{Interactions, NewComment};
use crate::models::{Comment, CreateComment, EditComment, LikeTarget};
use crate::routes::extract_actor;

pub fn comments_routes() -> Router<Interactions> {
    Router::new()
        .route(
            "/{photo_id}/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/{photo_id}/comments/{comment_id}",
            put(edit_comment).delete(delete_comment),
        )
        .route("/{photo_id}/comments/{comment_id}/like", post(like_comment))
}

async fn list_comments(
    State(interactions): State<Interactions>,
    Path(photo_id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let comments = interactions.list_comments(photo_id).await?;
    Ok(Json(comments))
}

async fn create_comment(
    State(interactions): State<Interactions>,
    headers: HeaderMap,
    Path(photo_id): Path<i64>,
    Json(input): Json<CreateComment>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let actor = extract_actor(&headers)?;
    let comment = interactions
        .create_comment(&NewComment {
            photo_id,
            author_id: actor.id,
            content: input.content,
            parent_comment_id: input.parent_comment_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn edit_comment(
    State(interactions): State<Interactions>,
    headers: HeaderMap,
    Path((photo_id, comment_id)): Path<(i64, i64)>,
    Json(input): Json<EditComment>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let actor = extract_actor(&headers)?;
    ensure_comment_in_photo(&interactions, photo_id, comment_id).await?;
    let comment = interactions
        .edit_comment(comment_id, &input.content, actor.id)
        .await?;
    Ok(Json(comment))
}

async fn delete_comment(
    State(interactions): State<Interactions>,
    headers: HeaderMap,
    Path((photo_id, comment_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let actor = extract_actor(&headers)?;
    ensure_comment_in_photo(&interactions, photo_id, comment_id).await?;
    interactions.delete_comment(comment_id, &actor).await?;
    Ok(Json(
        serde_json::json!({"message": "Comment deleted successfully"}),
    ))
}

async fn like_comment(
    State(interactions): State<Interactions>,
    headers: HeaderMap,
    Path((photo_id, comment_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let actor = extract_actor(&headers)?;
    ensure_comment_in_photo(&interactions, photo_id, comment_id).await?;
    let status = interactions
        .toggle_like(actor.id, LikeTarget::Comment, comment_id, Some(photo_id))
        .await?;
    Ok(Json(status))
}

/// A comment addressed under the wrong photo is indistinguishable from a
/// missing one.
async fn ensure_comment_in_photo(
    interactions: &Interactions,
    photo_id: i64,
    comment_id: i64,
) -> Result<Comment, (StatusCode, Json<serde_json::Value>)> {
    let comment = interactions.get_comment(comment_id).await?;
    if comment.photo_id != photo_id {
        return Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"detail": "Comment not found"})),
        ));
    }
    Ok(comment)
}
