use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ===== DOMAIN MODELS =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn fragment in a conversation. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Wall-clock seconds since the Unix epoch.
    pub timestamp: f64,
}

impl ChatMessage {
    pub fn new(role: Role, content: String) -> Self {
        Self {
            role,
            content,
            timestamp: now_epoch_secs(),
        }
    }
}

/// Full stored conversation history.
///
/// Messages are append-only with nondecreasing timestamps; the use case id
/// is fixed at creation and never changes across continuations.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub id: Uuid,
    pub messages: Vec<ChatMessage>,
    pub model_used: String,
    pub created_at: f64,
    pub use_case_id: String,
}

impl Conversation {
    pub fn new(model_used: String, use_case_id: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            model_used,
            created_at: now_epoch_secs(),
            use_case_id,
        }
    }

    /// Append a message, clamping its timestamp so the sequence stays
    /// nondecreasing even under clock adjustments.
    pub fn append(&mut self, mut message: ChatMessage) {
        if let Some(last) = self.messages.last() {
            if message.timestamp < last.timestamp {
                message.timestamp = last.timestamp;
            }
        }
        self.messages.push(message);
    }

    /// Last `n` messages, the slice replayed to the LLM on continuation.
    pub fn context_window(&self, n: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }
}

pub fn now_epoch_secs() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

// ===== REQUEST MODELS =====

#[derive(Debug, Deserialize)]
pub struct StartConversationRequest {
    pub message: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ContinueConversationRequest {
    pub message: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<usize>,
}

// ===== RESPONSE MODELS =====

#[derive(Debug, Serialize)]
pub struct ConversationTurnResponse {
    pub conversation_id: Uuid,
    pub response: String,
    pub model_used: String,
    pub timestamp: String,
    pub use_case_id: String,
    pub processing_time: f64,
    pub token_count: usize,
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ConversationView {
    pub conversation_id: Uuid,
    pub messages: Vec<ChatMessage>,
    pub model_used: String,
    pub created_at: f64,
    pub use_case_id: String,
}

impl From<Conversation> for ConversationView {
    fn from(conversation: Conversation) -> Self {
        Self {
            conversation_id: conversation.id,
            messages: conversation.messages,
            model_used: conversation.model_used,
            created_at: conversation.created_at,
            use_case_id: conversation.use_case_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_timestamps_nondecreasing() {
        let mut conversation = Conversation::new("m1".to_string(), "100000".to_string());

        let first = ChatMessage {
            role: Role::User,
            content: "hello".to_string(),
            timestamp: 100.0,
        };
        let backdated = ChatMessage {
            role: Role::Assistant,
            content: "hi".to_string(),
            timestamp: 50.0,
        };

        conversation.append(first);
        conversation.append(backdated);

        assert_eq!(conversation.messages[1].timestamp, 100.0);
    }

    #[test]
    fn context_window_takes_last_n() {
        let mut conversation = Conversation::new("m1".to_string(), "100000".to_string());
        for i in 0..30 {
            conversation.append(ChatMessage::new(Role::User, format!("msg {}", i)));
        }

        let window = conversation.context_window(10);
        assert_eq!(window.len(), 10);
        assert_eq!(window[0].content, "msg 20");
        assert_eq!(window[9].content, "msg 29");
    }

    #[test]
    fn context_window_shorter_than_n_returns_all() {
        let mut conversation = Conversation::new("m1".to_string(), "100000".to_string());
        conversation.append(ChatMessage::new(Role::User, "only".to_string()));

        assert_eq!(conversation.context_window(10).len(), 1);
    }

    #[test]
    fn conversation_ids_are_unique() {
        let a = Conversation::new("m1".to_string(), "100000".to_string());
        let b = Conversation::new("m1".to_string(), "100000".to_string());
        assert_ne!(a.id, b.id);
    }
}
