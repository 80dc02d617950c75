use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Completion, CompletionBackend};
use crate::config::Config;
use crate::error::{ChatError, Result};

#[derive(Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    temperature: f32,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Deserialize)]
struct OpenAIResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIUsage {
    #[serde(default)]
    total_tokens: u64,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: Option<OpenAIUsage>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIClient {
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;
        Ok(Self::new(api_key, config.base_url(), config.model()))
    }

    pub async fn query(&self, prompt: &str) -> Result<Completion> {
        let request = OpenAIRequest {
            model: self.model.clone(),
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.0,
        };

        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "completion request rejected");
            return Err(ChatError::RemoteCallFailed(format!(
                "OpenAI API error {}: {}",
                status, text
            )));
        }

        let openai_response: OpenAIResponse = response.json().await?;
        let total_tokens = openai_response.usage.map(|u| u.total_tokens).unwrap_or(0);
        let text = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::RemoteCallFailed("response contained no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        tracing::debug!(total_tokens, "completion received");
        Ok(Completion { text, total_tokens })
    }
}

#[async_trait]
impl CompletionBackend for OpenAIClient {
    async fn complete(&self, prompt: &str) -> Result<Completion> {
        self.query(prompt).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = OpenAIClient::new("sk-test", "http://localhost:1234/v1/", "gpt-4o-mini");
        assert_eq!(client.base_url, "http://localhost:1234/v1");
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_from_config_requires_key() {
        let err = OpenAIClient::from_config(&Config::new()).err();
        assert!(matches!(err, Some(ChatError::ConfigMissing(_))));
    }

    #[test]
    fn test_missing_usage_parses() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#;
        let parsed: OpenAIResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.usage.is_none());
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("hi"));
    }
}
