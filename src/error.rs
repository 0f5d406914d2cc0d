use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Request-level error taxonomy. Every handler failure is one of these;
/// the conversion to a response is the single place wire errors are shaped.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed client input → 400.
    #[error("{0}")]
    Validation(String),

    /// No row matched the target id → 404.
    #[error("{0}")]
    NotFound(String),

    /// Store connectivity or query failure → 500. The chain is logged
    /// server-side; the client only sees a generic message.
    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Database(err) => {
                error!("database error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}
