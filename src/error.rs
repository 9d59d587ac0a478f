use axum::{Json, http::StatusCode};
use thiserror::Error;

/// Domain errors raised by the interaction engine. The HTTP layer converts
/// them into the `(StatusCode, {"detail": ...})` shape route handlers return.
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, InteractionError>;

impl InteractionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Authorization(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<InteractionError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: InteractionError) -> Self {
        if let InteractionError::Storage(ref source) = err {
            tracing::error!(error = %source, "storage error while handling request");
        }
        (
            err.status_code(),
            Json(serde_json::json!({"detail": err.to_string()})),
        )
    }
}
