use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "service": "Chat API Server",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Health degrades (never fails) when the LLM backend is unreachable.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let status = match state.llm.health().await {
        Ok(()) => "healthy",
        Err(_) => "degraded",
    };

    Json(json!({
        "status": status,
        "active_conversations": state.manager.active_count(),
        "service": "chat-api-server",
    }))
}
