use crate::conversation::{Reply, SummarizingClient};
use crate::error::{ChatError, Result};
use crate::state::ConversationState;

/// Runs one user submission against the model and commits it to the
/// session as a single unit.
#[derive(Clone)]
pub struct TurnController {
    client: SummarizingClient,
}

impl TurnController {
    pub fn new(client: SummarizingClient) -> Self {
        Self { client }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Submit `user_text` and commit the exchange to `state`.
    ///
    /// On error `state` is left exactly as it was.
    pub async fn submit(&self, state: &mut ConversationState, user_text: &str) -> Result<()> {
        let reply = self.respond(state.summary(), user_text).await?;
        state.commit_turn(user_text, reply);
        Ok(())
    }

    /// The remote half of [`submit`](Self::submit). Front-ends that run the
    /// request off their event loop call this and commit the `Reply` with
    /// [`ConversationState::commit_turn`] once it arrives.
    pub async fn respond(&self, summary: &str, user_text: &str) -> Result<Reply> {
        if user_text.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }

        self.client.respond(summary, user_text).await.map_err(|e| {
            tracing::warn!(error = %e, "turn discarded");
            e
        })
    }
}
