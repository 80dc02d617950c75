pub mod ai;
pub mod config;
pub mod conversation;
pub mod error;
pub mod memory;
pub mod state;
pub mod turn;

// Re-export main types for convenience
pub use ai::{Completion, CompletionBackend, OpenAIClient};
pub use config::Config;
pub use conversation::{Reply, SummarizingClient};
pub use error::ChatError;
pub use state::{ChatMessage, ChatOrigin, ConversationState};
pub use turn::TurnController;
