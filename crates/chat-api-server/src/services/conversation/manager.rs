use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::chat::{ChatMessage, Conversation, Role};
use crate::utils::error::ApiError;

use super::store::ConversationStore;
use super::types::{
    Generation, GenerationOptions, InferenceOutcome, ModelInfo, TurnOutcome,
    CONTEXT_WINDOW_MESSAGES,
};

/// Trait for the LLM backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &GenerationOptions,
    ) -> Result<Generation>;

    async fn list_models(&self) -> Result<Vec<ModelInfo>>;

    async fn health(&self) -> Result<()>;
}

/// Owns conversation lifecycle and bounds the context replayed to the LLM.
pub struct ConversationManager {
    store: ConversationStore,
    llm: Arc<dyn LlmProvider>,
    default_model: String,
}

impl ConversationManager {
    pub fn new(llm: Arc<dyn LlmProvider>, default_model: String) -> Self {
        Self {
            store: ConversationStore::new(),
            llm,
            default_model,
        }
    }

    /// Create a conversation and run its first turn.
    ///
    /// The conversation is created and stored even when inference fails;
    /// the failure is absorbed into a degraded assistant message.
    pub async fn start_conversation(
        &self,
        message: String,
        model: Option<String>,
        options: GenerationOptions,
        use_case_id: Option<String>,
    ) -> TurnOutcome {
        let model = model.unwrap_or_else(|| self.default_model.clone());
        let use_case_id = use_case_id.unwrap_or_else(|| "unknown".to_string());

        let mut conversation = Conversation::new(model.clone(), use_case_id);
        let user_message = ChatMessage::new(Role::User, message);

        let outcome = self
            .run_inference(&model, std::slice::from_ref(&user_message), &options)
            .await;

        let turn = self.finish_turn(&mut conversation, user_message, outcome);
        self.store.insert(conversation.clone());

        info!(
            "New conversation started: {} for use-case: {}",
            conversation.id, conversation.use_case_id
        );

        TurnOutcome {
            conversation,
            ..turn
        }
    }

    /// Append one turn to an existing conversation.
    ///
    /// Turns against the same id are serialized through a per-id lock;
    /// distinct ids proceed fully concurrently. Only the last
    /// `CONTEXT_WINDOW_MESSAGES` stored messages are replayed to the LLM.
    pub async fn continue_conversation(
        &self,
        id: Uuid,
        message: String,
        model: Option<String>,
        options: GenerationOptions,
    ) -> Result<TurnOutcome, ApiError> {
        if !self.store.contains(id) {
            return Err(ApiError::ConversationNotFound(id.to_string()));
        }

        let lock = self.store.turn_lock(id);
        let _guard = lock.lock().await;

        // Re-check under the lock: a concurrent delete may have won.
        let mut conversation = self
            .store
            .get(id)
            .ok_or_else(|| ApiError::ConversationNotFound(id.to_string()))?;

        let model = model.unwrap_or_else(|| conversation.model_used.clone());
        let user_message = ChatMessage::new(Role::User, message);

        let mut context: Vec<ChatMessage> =
            conversation.context_window(CONTEXT_WINDOW_MESSAGES).to_vec();
        context.push(user_message.clone());

        let outcome = self.run_inference(&model, &context, &options).await;

        let turn = self.finish_turn(&mut conversation, user_message, outcome);
        self.store.insert(conversation.clone());

        Ok(TurnOutcome {
            conversation,
            ..turn
        })
    }

    pub fn get_conversation(&self, id: Uuid) -> Result<Conversation, ApiError> {
        self.store
            .get(id)
            .ok_or_else(|| ApiError::ConversationNotFound(id.to_string()))
    }

    /// Deletion is immediate and irreversible. Takes the per-id lock so it
    /// cannot interleave with an in-flight continuation of the same id.
    pub async fn delete_conversation(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.store.contains(id) {
            return Err(ApiError::ConversationNotFound(id.to_string()));
        }

        let lock = self.store.turn_lock(id);
        let _guard = lock.lock().await;

        self.store
            .remove(id)
            .map(|_| info!("Conversation deleted: {}", id))
            .ok_or_else(|| ApiError::ConversationNotFound(id.to_string()))
    }

    pub fn active_count(&self) -> usize {
        self.store.len()
    }

    async fn run_inference(
        &self,
        model: &str,
        context: &[ChatMessage],
        options: &GenerationOptions,
    ) -> InferenceOutcome {
        match self.llm.generate(model, context, options).await {
            Ok(generation) => InferenceOutcome::Ok(generation),
            Err(e) => {
                warn!("Inference failed, degrading turn: {}", e);
                InferenceOutcome::Degraded {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Append the user/assistant pair for one turn and build its outcome.
    fn finish_turn(
        &self,
        conversation: &mut Conversation,
        user_message: ChatMessage,
        outcome: InferenceOutcome,
    ) -> TurnOutcome {
        let (response, success, processing_time, token_count) = match outcome {
            InferenceOutcome::Ok(Generation {
                content,
                processing_time,
                token_count,
            }) => (content, true, processing_time, token_count),
            InferenceOutcome::Degraded { reason } => (
                format!(
                    "I'm sorry, I couldn't generate a response right now ({}). \
                     Please try again in a moment.",
                    reason
                ),
                false,
                0.0,
                0,
            ),
        };

        conversation.append(user_message);
        conversation.append(ChatMessage::new(Role::Assistant, response.clone()));

        TurnOutcome {
            conversation: conversation.clone(),
            response,
            success,
            processing_time,
            token_count,
        }
    }
}
