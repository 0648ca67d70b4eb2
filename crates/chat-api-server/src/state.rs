use std::sync::Arc;

use crate::services::conversation::{ConversationManager, LlmProvider};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<ConversationManager>,
    pub llm: Arc<dyn LlmProvider>,
}
