use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::Response,
};
use std::net::SocketAddr;
use tracing::{info, warn};

use crate::security::authorize;
use crate::state::AppState;
use crate::utils::error::ApiError;

pub const USE_CASE_HEADER: &str = "X-Use-Case-ID";

/// Catch-all handler: authorize the request, then relay it verbatim.
///
/// Authorization failures are resolved here and never reach the backend.
pub async fn proxy_request(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
) -> Result<Response<Body>, ApiError> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let use_case_id = request
        .headers()
        .get(USE_CASE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    info!(
        "Request: {} {} - Use-Case-ID: {}",
        method,
        path,
        use_case_id.as_deref().unwrap_or("<none>")
    );

    let snapshot = state.policy.current().await;

    match authorize(&snapshot, use_case_id.as_deref()) {
        Ok(approved) => {
            if !approved.id.is_empty() {
                info!(
                    "Approved request: Use case '{}' ({}) is authorized",
                    approved.id, approved.description
                );
            }
        }
        Err(rejection) => {
            if snapshot.log_rejected {
                match &rejection {
                    ApiError::MissingHeader => {
                        warn!(
                            "Rejected request: Missing {} header from {}",
                            USE_CASE_HEADER,
                            addr.ip()
                        );
                    }
                    ApiError::UnauthorizedUseCase { use_case_id, .. } => {
                        warn!(
                            "Rejected request: Unauthorized use case '{}' from {}",
                            use_case_id,
                            addr.ip()
                        );
                    }
                    _ => {}
                }
            }
            return Err(rejection);
        }
    }

    state.forwarder.forward(request).await
}
