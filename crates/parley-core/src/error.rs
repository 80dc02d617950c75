use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the conversation core.
///
/// `ConfigMissing` is fatal at startup. `RemoteCallFailed` only discards the
/// turn that was in flight.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("configuration missing: {0}")]
    ConfigMissing(String),

    #[error("invalid config file {path}: {source}")]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("remote call failed: {0}")]
    RemoteCallFailed(String),

    #[error("message is empty")]
    EmptyInput,
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::RemoteCallFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
