//! Integration tests for the OpenAI backend and a full turn over HTTP

use std::sync::Arc;

use parley_core::{
    ChatError, ChatMessage, CompletionBackend, ConversationState, OpenAIClient, SummarizingClient,
    TurnController,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion_body(content: &str, total_tokens: u64) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1234567890,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": total_tokens / 2,
            "completion_tokens": total_tokens - total_tokens / 2,
            "total_tokens": total_tokens
        }
    })
}

#[tokio::test]
async fn test_completion_sends_model_temperature_and_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.0,
            "messages": [{ "role": "user", "content": "ping" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("pong", 7)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenAIClient::new("sk-test", &mock_server.uri(), "gpt-4o-mini");
    let completion = client.complete("ping").await.expect("completion");

    assert_eq!(completion.text, "pong");
    assert_eq!(completion.total_tokens, 7);
}

#[tokio::test]
async fn test_auth_failure_is_remote_call_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"error": {"message": "Incorrect API key provided"}}"#),
        )
        .mount(&mock_server)
        .await;

    let client = OpenAIClient::new("sk-wrong", &mock_server.uri(), "gpt-4o-mini");
    let err = client.complete("ping").await.unwrap_err();

    match err {
        ChatError::RemoteCallFailed(msg) => {
            assert!(msg.contains("401"));
            assert!(msg.contains("Incorrect API key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_garbage_body_is_remote_call_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = OpenAIClient::new("sk-test", &mock_server.uri(), "gpt-4o-mini");
    let err = client.complete("ping").await.unwrap_err();
    assert!(matches!(err, ChatError::RemoteCallFailed(_)));
}

#[tokio::test]
async fn test_empty_choices_is_remote_call_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&mock_server)
        .await;

    let client = OpenAIClient::new("sk-test", &mock_server.uri(), "gpt-4o-mini");
    let err = client.complete("ping").await.unwrap_err();
    assert!(matches!(err, ChatError::RemoteCallFailed(_)));
}

#[tokio::test]
async fn test_turn_over_http_counts_both_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Progressively summarize"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("The human greets the AI.", 5)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("friendly conversation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(" Hi there!", 7)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = Arc::new(OpenAIClient::new("sk-test", &mock_server.uri(), "gpt-4o-mini"));
    let turns = TurnController::new(SummarizingClient::new(backend));
    let mut state = ConversationState::new();

    turns.submit(&mut state, "Hello").await.expect("turn");

    assert_eq!(
        state.messages(),
        &[ChatMessage::human("Hello"), ChatMessage::assistant("Hi there!")]
    );
    assert_eq!(state.summary(), "The human greets the AI.");
    assert_eq!(state.token_count(), 12);
}

#[tokio::test]
async fn test_server_error_discards_turn() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = Arc::new(OpenAIClient::new("sk-test", &mock_server.uri(), "gpt-4o-mini"));
    let turns = TurnController::new(SummarizingClient::new(backend));
    let mut state = ConversationState::new();

    let err = turns.submit(&mut state, "Hello").await.unwrap_err();
    assert!(matches!(err, ChatError::RemoteCallFailed(_)));
    assert!(state.messages().is_empty());
    assert_eq!(state.token_count(), 0);
    assert_eq!(state.summary(), "");
}
