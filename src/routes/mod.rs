pub mod comments;
pub mod photos;
pub mod users;

pub use comments::comments_routes;
pub use photos::photos_routes;
pub use users::users_routes;

use axum::{
    Json,
    http::{HeaderMap, StatusCode},
};

use crate::interactions::Actor;

/// Rebuilds the acting user from the identity headers the auth
/// collaborator sets after verifying the session upstream.
pub fn extract_actor(headers: &HeaderMap) -> Result<Actor, (StatusCode, Json<serde_json::Value>)> {
    let user_id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"detail": "Missing X-User-Id header"})),
            )
        })?
        .parse::<i64>()
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"detail": "Invalid X-User-Id header"})),
            )
        })?;

    let is_admin = headers
        .get("x-user-role")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|role| role.eq_ignore_ascii_case("admin"));

    Ok(Actor {
        id: user_id,
        is_admin,
    })
}
