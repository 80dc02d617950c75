use std::sync::Arc;

use crate::ai::CompletionBackend;
use crate::error::Result;
use crate::memory;

/// The outcome of one successful round trip: the model's answer, the summary
/// that should replace the old one, and every token the turn cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub summary: String,
    pub tokens_used: u64,
}

/// Talks to the remote model using a rolling summary instead of the full
/// transcript. Holds no session state of its own.
#[derive(Clone)]
pub struct SummarizingClient {
    backend: Arc<dyn CompletionBackend>,
}

impl SummarizingClient {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Answer `user_text`, then fold the exchange into a new summary.
    ///
    /// Both remote calls must succeed; the first failure is returned and
    /// nothing from the partial turn escapes.
    pub async fn respond(&self, summary: &str, user_text: &str) -> Result<Reply> {
        let answer = self
            .backend
            .complete(&memory::conversation_prompt(summary, user_text))
            .await?;
        let text = answer.text.trim().to_string();

        let digest = self
            .backend
            .complete(&memory::summary_prompt(summary, user_text, &text))
            .await?;

        let tokens_used = answer.total_tokens.saturating_add(digest.total_tokens);
        tracing::info!(
            tokens_used,
            reply_chars = text.len(),
            summary_chars = digest.text.len(),
            "turn answered"
        );

        Ok(Reply {
            text,
            summary: digest.text.trim().to_string(),
            tokens_used,
        })
    }
}
