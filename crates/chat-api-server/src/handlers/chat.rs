use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::models::chat::{
    ContinueConversationRequest, ConversationTurnResponse, ConversationView, now_epoch_secs,
    StartConversationRequest,
};
use crate::services::conversation::{GenerationOptions, TurnOutcome};
use crate::state::AppState;
use crate::utils::error::ApiError;

pub const USE_CASE_HEADER: &str = "x-use-case-id";

/// The gateway forwards the client's use-case header through unmodified.
fn use_case_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USE_CASE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

fn turn_response(turn: TurnOutcome) -> ConversationTurnResponse {
    ConversationTurnResponse {
        conversation_id: turn.conversation.id,
        response: turn.response,
        model_used: turn.conversation.model_used,
        timestamp: format!("{}", now_epoch_secs()),
        use_case_id: turn.conversation.use_case_id,
        processing_time: turn.processing_time,
        token_count: turn.token_count,
        success: turn.success,
    }
}

pub async fn start_conversation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<StartConversationRequest>,
) -> Result<Json<ConversationTurnResponse>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let use_case_id = use_case_from(&headers);
    info!(
        "Start conversation: model={:?}, use_case={:?}, message_len={}",
        request.model,
        use_case_id,
        request.message.len()
    );

    let turn = state
        .manager
        .start_conversation(
            request.message,
            request.model,
            GenerationOptions {
                temperature: request.temperature,
                max_tokens: request.max_tokens,
            },
            use_case_id,
        )
        .await;

    Ok(Json(turn_response(turn)))
}

pub async fn continue_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ContinueConversationRequest>,
) -> Result<Json<ConversationTurnResponse>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let turn = state
        .manager
        .continue_conversation(
            id,
            request.message,
            request.model,
            GenerationOptions {
                temperature: request.temperature,
                max_tokens: request.max_tokens,
            },
        )
        .await?;

    Ok(Json(turn_response(turn)))
}

pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationView>, ApiError> {
    let conversation = state.manager.get_conversation(id)?;
    Ok(Json(conversation.into()))
}

pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.manager.delete_conversation(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
