use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::config::Settings;
use crate::security::PolicySnapshot;
use crate::state::AppState;
use crate::utils::error::ApiError;

/// Service banner, also doubles as a liveness probe.
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.policy.current().await;
    Json(json!({
        "service": "Use-Case-ID Proxy",
        "status": "running",
        "allowed_use_cases": snapshot.allowed_ids(),
        "backend_url": state.forwarder.backend_url(),
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.policy.current().await;
    Json(json!({
        "status": "healthy",
        "allowed_use_cases": snapshot.allowed_ids(),
    }))
}

/// Current configuration, for operational visibility.
pub async fn get_config(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.policy.current().await;

    let descriptions: serde_json::Map<String, Value> = snapshot
        .use_cases
        .iter()
        .map(|uc| (uc.id.clone(), Value::String(uc.description.clone())))
        .collect();

    Json(json!({
        "allowed_use_cases": snapshot.allowed_ids(),
        "use_case_descriptions": descriptions,
        "security_config": {
            "require_use_case_header": snapshot.require_header,
            "case_sensitive_matching": snapshot.case_sensitive,
            "log_rejected_requests": snapshot.log_rejected,
        },
        "backend_url": state.forwarder.backend_url(),
    }))
}

/// Re-read the settings file and swap in a fresh policy snapshot.
pub async fn reload_config(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let settings = Settings::load_from(&state.config_name).map_err(|e| {
        error!("Error reloading config: {}", e);
        ApiError::InternalError(format!("Error reloading config: {}", e))
    })?;

    let snapshot = PolicySnapshot::from_settings(&settings);
    state.policy.replace(snapshot).await;

    let current = state.policy.current().await;
    info!("Configuration reloaded");

    Ok(Json(json!({
        "status": "success",
        "message": "Configuration reloaded",
        "allowed_use_cases": current.allowed_ids(),
    })))
}
