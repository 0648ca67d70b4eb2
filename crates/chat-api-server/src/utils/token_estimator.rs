/// Token estimation for mixed-language chat content, used when the LLM
/// backend omits usage figures in its response.

use crate::models::chat::ChatMessage;

/// Estimate tokens from text using a word-based heuristic.
/// Rule: avg ~1.3 tokens per word, plus a small formatting overhead.
pub fn estimate_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }

    let words = text.split_whitespace().count();

    ((words as f64 * 1.3) + 5.0).ceil() as usize
}

/// Estimate tokens across a full message list.
pub fn estimate_messages_tokens(messages: &[ChatMessage]) -> usize {
    messages
        .iter()
        .map(|message| estimate_tokens(&message.content))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;

    #[test]
    fn test_token_estimation() {
        // 7 words * 1.3 + 5 = 14.1, rounded up
        let text = "the quick brown fox jumps over everything";
        let tokens = estimate_tokens(text);
        assert!((13..=16).contains(&tokens));
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn test_message_list_sums_contents() {
        let messages = vec![
            ChatMessage::new(Role::User, "hello there".to_string()),
            ChatMessage::new(Role::Assistant, "hi".to_string()),
        ];
        let total = estimate_messages_tokens(&messages);
        assert_eq!(
            total,
            estimate_tokens("hello there") + estimate_tokens("hi")
        );
    }
}
