use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;
use crate::utils::error::ApiError;

/// Passthrough to the LLM backend's model listing.
pub async fn list_models(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let models = state
        .llm
        .list_models()
        .await
        .map_err(|e| ApiError::LlmError(format!("Failed to list models: {}", e)))?;

    Ok(Json(json!({ "models": models })))
}
