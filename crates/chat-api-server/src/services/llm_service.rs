use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::config::LlmConfig;
use crate::models::chat::{ChatMessage, Role};
use crate::services::conversation::manager::LlmProvider;
use crate::services::conversation::types::{Generation, GenerationOptions, ModelInfo};
use crate::utils::token_estimator;

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

fn role_str(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: usize,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    data: Vec<ModelInfo>,
}

/// OpenAI-compatible completion client (non-streaming).
#[derive(Clone)]
pub struct LlmService {
    client: Client,
    config: LlmConfig,
}

impl LlmService {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(config.timeout_seconds))
                .build()
                .expect("Failed to create HTTP client"),
            config,
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for LlmService {
    async fn generate(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &GenerationOptions,
    ) -> Result<Generation> {
        debug!("Starting chat generation with {} messages", messages.len());

        let request = ChatCompletionRequest {
            model,
            messages: messages
                .iter()
                .map(|message| WireMessage {
                    role: role_str(message.role),
                    content: &message.content,
                })
                .collect(),
            max_tokens: options.max_tokens.unwrap_or(self.config.max_tokens),
            temperature: options.temperature.unwrap_or(0.7),
            stream: false,
        };

        let started = Instant::now();

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to call LLM API: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("LLM API error: {} - {}", status, body));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse LLM response: {}", e))?;

        let processing_time = started.elapsed().as_secs_f64();

        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow!("No choices returned from LLM"))?;

        // Backends that omit usage fall back to a word-based estimate.
        let token_count = completion
            .usage
            .map(|usage| usage.total_tokens)
            .unwrap_or_else(|| {
                token_estimator::estimate_messages_tokens(messages)
                    + token_estimator::estimate_tokens(&content)
            });

        Ok(Generation {
            content,
            processing_time,
            token_count,
        })
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self
            .client
            .get(format!("{}/v1/models", self.config.base_url))
            .send()
            .await
            .map_err(|e| anyhow!("Failed to call LLM API: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("LLM API error: {}", response.status()));
        }

        let models: ModelsResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse models response: {}", e))?;

        Ok(models.data)
    }

    async fn health(&self) -> Result<()> {
        self.list_models().await.map(|_| ())
    }
}
