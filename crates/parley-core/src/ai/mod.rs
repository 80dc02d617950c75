pub mod openai;

pub use openai::OpenAIClient;

use async_trait::async_trait;

use crate::error::Result;

/// One completion returned by the remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub total_tokens: u64,
}

/// A hosted model that turns a prompt into a completion with deterministic
/// decoding. Any failure is reported as `ChatError::RemoteCallFailed`.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Completion>;

    fn model(&self) -> &str;
}
