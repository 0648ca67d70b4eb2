use serde::{Deserialize, Serialize};

use crate::models::chat::Conversation;

/// How many stored messages are replayed to the LLM on a continuation.
/// Truncation applies only to what is sent, never to what is stored.
pub const CONTEXT_WINDOW_MESSAGES: usize = 10;

/// Per-request generation knobs, taken from the request body with config
/// defaults applied by the LLM service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
}

/// A completed generation from the LLM backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub content: String,
    /// Wall-clock seconds spent waiting on the backend.
    pub processing_time: f64,
    pub token_count: usize,
}

/// Model listing entry from the backend's introspection surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
}

/// Tagged result of one inference attempt.
///
/// Backend failures become `Degraded` rather than an error: a chat turn
/// never hard-fails on backend unavailability.
#[derive(Debug, Clone)]
pub enum InferenceOutcome {
    Ok(Generation),
    Degraded { reason: String },
}

/// Result of one start/continue turn, consumed by the HTTP layer.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub conversation: Conversation,
    pub response: String,
    pub success: bool,
    pub processing_time: f64,
    pub token_count: usize,
}
