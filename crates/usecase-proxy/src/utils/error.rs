use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing required header: X-Use-Case-ID")]
    MissingHeader,

    #[error("Unauthorized use case: {use_case_id}")]
    UnauthorizedUseCase {
        use_case_id: String,
        allowed: Vec<String>,
    },

    #[error("Backend service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingHeader => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "detail": "Missing required header: X-Use-Case-ID"
                })),
            )
                .into_response(),
            ApiError::UnauthorizedUseCase {
                use_case_id,
                allowed,
            } => (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "detail": format!(
                        "Unauthorized use case: {}. Allowed values: {:?}",
                        use_case_id, allowed
                    ),
                    "use_case_id": use_case_id,
                    "allowed_use_cases": allowed,
                })),
            )
                .into_response(),
            ApiError::UpstreamUnavailable(msg) => {
                tracing::error!("Upstream unavailable: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({
                        "detail": format!("Backend service unavailable: {}", msg)
                    })),
                )
                    .into_response()
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "detail": "Internal server error"
                    })),
                )
                    .into_response()
            }
        }
    }
}
