use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers;
use crate::state::AppState;

/// Build the chat service router. Reached only through the gateway, which
/// owns authorization; this service trusts the forwarded headers.
pub fn build_router(state: AppState) -> Router {
    let chat_routes = Router::new()
        .route(
            "/spaces/start-conversation",
            post(handlers::chat::start_conversation),
        )
        .route(
            "/conversations/{id}/continue",
            post(handlers::chat::continue_conversation),
        )
        .route(
            "/conversations/{id}",
            get(handlers::chat::get_conversation).delete(handlers::chat::delete_conversation),
        )
        .route("/health", get(handlers::health::health_check));

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/models", get(handlers::models::list_models))
        .nest("/api/2.0/chat", chat_routes)
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
}
