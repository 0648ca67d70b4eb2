use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::ConversationNotFound(id) => {
                tracing::warn!("Conversation not found: {}", id);
                (
                    StatusCode::NOT_FOUND,
                    "ConversationNotFound",
                    format!("Conversation not found: {}", id),
                )
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "BadRequest", msg)
            }
            ApiError::LlmError(msg) => {
                tracing::error!("LLM error: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "LlmError", msg)
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "InternalError", msg)
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
