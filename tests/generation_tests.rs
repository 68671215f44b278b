//! Story generation against a mocked Chat Completions endpoint.

use std::time::Duration;

use crimecast::error::{ErrorCategory, StoryError};
use crimecast::generation::{OpenAiStoryGenerator, StoryGenerator};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_response(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 40, "total_tokens": 52 }
    })
}

#[tokio::test]
async fn generate_story_happy_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.7,
            "stream": false,
            "messages": [{ "role": "user", "content": "Write a noir story." }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(
            "The dame walked in at midnight.\nShe was trouble.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let generator = OpenAiStoryGenerator::new_with_base_url("test-key".to_string(), server.uri());

    let story = generator
        .generate_story("Write a noir story.")
        .await
        .expect("generation should succeed");

    assert_eq!(story, "The dame walked in at midnight.\nShe was trouble.");
}

#[tokio::test]
async fn quota_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "You exceeded your current quota", "type": "insufficient_quota" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let generator = OpenAiStoryGenerator::new_with_base_url("test-key".to_string(), server.uri());

    let err = generator
        .generate_story("Write a story.")
        .await
        .expect_err("quota error should fail");

    assert!(
        matches!(err, StoryError::RateLimited(ref message) if message == "You exceeded your current quota")
    );
    assert_eq!(err.category(), ErrorCategory::Service);
}

#[tokio::test]
async fn server_error_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .expect(1)
        .mount(&server)
        .await;

    let generator = OpenAiStoryGenerator::new_with_base_url("test-key".to_string(), server.uri());

    let err = generator.generate_story("Write a story.").await.unwrap_err();
    assert!(matches!(err, StoryError::Api { status: 500, .. }));
}

#[tokio::test]
async fn malformed_json_is_serialization_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_bytes(b"{not-json".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let generator = OpenAiStoryGenerator::new_with_base_url("test-key".to_string(), server.uri());

    let err = generator.generate_story("Write a story.").await.unwrap_err();
    assert!(matches!(err, StoryError::Serialization(_)));
}

#[tokio::test]
async fn empty_choices_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let generator = OpenAiStoryGenerator::new_with_base_url("test-key".to_string(), server.uri());

    let err = generator.generate_story("Write a story.").await.unwrap_err();
    assert!(matches!(err, StoryError::InvalidResponse(_)));
}

#[tokio::test]
async fn missing_api_key_fails_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let generator = OpenAiStoryGenerator::new_with_base_url(String::new(), server.uri());

    let err = generator.generate_story("Write a story.").await.unwrap_err();
    assert!(matches!(err, StoryError::Configuration(_)));
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_response("too late"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let generator = OpenAiStoryGenerator::new_with_base_url("test-key".to_string(), server.uri())
        .with_timeout(Duration::from_millis(100));

    let err = generator.generate_story("Write a story.").await.unwrap_err();
    assert!(matches!(err, StoryError::Timeout(100)));
}
