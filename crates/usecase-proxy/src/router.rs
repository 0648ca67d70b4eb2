use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers;
use crate::state::AppState;

/// Build the gateway router.
///
/// The four locally served routes form the authorization bypass set; every
/// other path and method falls through to authorize-then-forward.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::admin::root))
        .route("/health", get(handlers::admin::health))
        .route("/config", get(handlers::admin::get_config))
        .route("/config/reload", post(handlers::admin::reload_config))
        .fallback(handlers::proxy::proxy_request)
        .with_state(state)
        .layer(
            CorsLayer::permissive()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
}
