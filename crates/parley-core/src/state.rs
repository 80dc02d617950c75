//! UI-agnostic conversation state
//!
//! These types are shared by every front-end and don't depend on any UI
//! framework. The only way to change a [`ConversationState`] is to commit a
//! whole turn, so a front-end can never observe half of an exchange.

use serde::{Deserialize, Serialize};

use crate::conversation::Reply;

/// A chat message in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub origin: ChatOrigin,
    pub text: String,
}

/// Who sent a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatOrigin {
    Human,
    Assistant,
}

impl ChatMessage {
    pub fn human(text: impl Into<String>) -> Self {
        Self {
            origin: ChatOrigin::Human,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            origin: ChatOrigin::Assistant,
            text: text.into(),
        }
    }
}

/// Everything a session remembers: the visible transcript, the rolling
/// summary handed to the model, and the tokens spent so far.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationState {
    messages: Vec<ChatMessage>,
    summary: String,
    token_count: u64,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Current rolling summary. Empty until the first turn commits.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn token_count(&self) -> u64 {
        self.token_count
    }

    pub fn turn_count(&self) -> usize {
        self.messages.len() / 2
    }

    /// Append both sides of an exchange, replace the summary and add the
    /// turn's token usage.
    pub fn commit_turn(&mut self, user_text: impl Into<String>, reply: Reply) {
        self.messages.push(ChatMessage::human(user_text));
        self.messages.push(ChatMessage::assistant(reply.text));
        self.summary = reply.summary;
        self.token_count = self.token_count.saturating_add(reply.tokens_used);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(text: &str, summary: &str, tokens: u64) -> Reply {
        Reply {
            text: text.to_string(),
            summary: summary.to_string(),
            tokens_used: tokens,
        }
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = ConversationState::new();
        assert!(state.messages().is_empty());
        assert_eq!(state.summary(), "");
        assert_eq!(state.token_count(), 0);
        assert_eq!(state.turn_count(), 0);
    }

    #[test]
    fn test_commit_appends_human_then_assistant() {
        let mut state = ConversationState::new();
        state.commit_turn("Hello", reply("Hi there!", "The human greets the AI.", 12));

        assert_eq!(
            state.messages(),
            &[ChatMessage::human("Hello"), ChatMessage::assistant("Hi there!")]
        );
        assert_eq!(state.summary(), "The human greets the AI.");
        assert_eq!(state.token_count(), 12);
        assert_eq!(state.turn_count(), 1);
    }

    #[test]
    fn test_summary_is_replaced_not_appended() {
        let mut state = ConversationState::new();
        state.commit_turn("A", reply("a", "first", 1));
        state.commit_turn("B", reply("b", "second", 1));
        assert_eq!(state.summary(), "second");
    }

    #[test]
    fn test_token_count_never_decreases() {
        let mut state = ConversationState::new();
        let mut previous = 0;
        for (i, tokens) in [5, 0, 7, 3].into_iter().enumerate() {
            state.commit_turn(format!("q{i}"), reply("r", "s", tokens));
            assert!(state.token_count() >= previous);
            previous = state.token_count();
        }
        assert_eq!(state.token_count(), 15);
        assert_eq!(state.messages().len(), 8);
    }

    #[test]
    fn test_origin_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::assistant("ok")).unwrap();
        assert_eq!(json, r#"{"origin":"assistant","text":"ok"}"#);
    }
}
