#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

//! Helpers to fake the `OpenAI` chat completions endpoint with wiremock

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use retablo_integrations as integrations;

/// An `OpenAI` client pointed at a mock server, without retries
pub fn openai_client(mock_server_uri: &str, prompt_model: &str) -> integrations::openai::OpenAI {
    let config = async_openai::config::OpenAIConfig::new()
        .with_api_base(mock_server_uri)
        .with_api_key("test-key");

    integrations::openai::OpenAI::builder()
        .client(integrations::openai::client_without_retries(config))
        .default_prompt_model(prompt_model)
        .max_completion_tokens(300)
        .temperature(0.2)
        .build()
        .expect("Can create OpenAI client.")
}

/// A successful chat completion response body with `content` as the only choice
pub fn chat_completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1_677_652_288,
        "model": "gpt-4-turbo-2024-04-09",
        "system_fingerprint": "fp_44709d6fcb",
        "choices": [{
          "index": 0,
          "message": {
            "role": "assistant",
            "content": content,
          },
          "logprobs": null,
          "finish_reason": "stop"
        }],
        "usage": {
          "prompt_tokens": 9,
          "completion_tokens": 12,
          "total_tokens": 21
        }
    })
}

/// An `OpenAI` style error body
pub fn error_body(message: &str, kind: &str) -> serde_json::Value {
    json!({
        "error": {
            "message": message,
            "type": kind,
            "param": null,
            "code": kind,
        }
    })
}

/// Mock chat completions endpoint, answering every request with `content`
pub async fn mock_chat_completion(mock_server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion_body(content)))
        .mount(mock_server)
        .await;
}

/// Mock chat completions endpoint, failing every request with `status`
pub async fn mock_chat_completion_failure(mock_server: &MockServer, status: u16, message: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(error_body(message, "invalid_request_error")),
        )
        .mount(mock_server)
        .await;
}
