//! Fallback behavior against a simulated provider.
//!
//! The contract under test: whatever the provider does short of returning a
//! well-formed reflection, the caller still gets a 200 whose body equals
//! the heuristic's deterministic output, and the provider is attempted
//! exactly once per request.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reflectd::providers::{OpenAiStrategy, ReflectionStrategy};
use reflectd::reflection::{HeuristicStrategy, ReflectionRequest, ReflectionService, heuristic};

const ENTRY: &str = "Quiet morning. Loud afternoon! Slept early.";

fn request_for(content: &str) -> ReflectionRequest {
    ReflectionRequest {
        entry_id: "e1".to_string(),
        goal: None,
        content: content.to_string(),
    }
}

fn service_against(server_uri: &str) -> ReflectionService {
    let external = OpenAiStrategy::with_base_url(server_uri, "test-key", Duration::from_secs(5));
    ReflectionService::with_strategies(vec![Arc::new(external), Arc::new(HeuristicStrategy)])
}

async fn mount_completion(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

fn completion_with_content(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

#[tokio::test]
async fn provider_success_is_returned_verbatim() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        completion_with_content(r#"{"reflection":"A calm day, well spent.","action":"Sleep early again."}"#),
    )
    .await;

    let service = service_against(&server.uri());
    let result = service.handle(&request_for(ENTRY)).await.unwrap();

    assert_eq!(result.reflection, "A calm day, well spent.");
    assert_eq!(result.action.as_deref(), Some("Sleep early again."));
    server.verify().await;
}

#[tokio::test]
async fn provider_may_omit_the_action() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        completion_with_content(r#"{"reflection":"Noted."}"#),
    )
    .await;

    let service = service_against(&server.uri());
    let result = service.handle(&request_for(ENTRY)).await.unwrap();

    assert_eq!(result.reflection, "Noted.");
    assert!(result.action.is_none());
}

#[tokio::test]
async fn non_2xx_falls_back_to_heuristic() {
    let server = MockServer::start().await;
    mount_completion(&server, ResponseTemplate::new(500).set_body_string("boom")).await;

    let service = service_against(&server.uri());
    let result = service.handle(&request_for(ENTRY)).await.unwrap();

    assert_eq!(result, heuristic::generate("", ENTRY));
    // expect(1) on the mock also proves there was no retry
    server.verify().await;
}

#[tokio::test]
async fn rate_limit_falls_back_to_heuristic() {
    let server = MockServer::start().await;
    mount_completion(&server, ResponseTemplate::new(429)).await;

    let service = service_against(&server.uri());
    let result = service.handle(&request_for(ENTRY)).await.unwrap();

    assert_eq!(result, heuristic::generate("", ENTRY));
}

#[tokio::test]
async fn non_json_completion_falls_back_to_heuristic() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        completion_with_content("Here is a lovely reflection for you!"),
    )
    .await;

    let service = service_against(&server.uri());
    let result = service.handle(&request_for(ENTRY)).await.unwrap();

    assert_eq!(result, heuristic::generate("", ENTRY));
}

#[tokio::test]
async fn missing_message_content_falls_back_to_heuristic() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"choices": []})),
    )
    .await;

    let service = service_against(&server.uri());
    let result = service.handle(&request_for(ENTRY)).await.unwrap();

    assert_eq!(result, heuristic::generate("", ENTRY));
}

#[tokio::test]
async fn empty_reflection_field_falls_back_to_heuristic() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        completion_with_content(r#"{"reflection":"","action":"x"}"#),
    )
    .await;

    let service = service_against(&server.uri());
    let result = service.handle(&request_for(ENTRY)).await.unwrap();

    assert_eq!(result, heuristic::generate("", ENTRY));
}

#[tokio::test]
async fn unreachable_provider_falls_back_to_heuristic() {
    // Nothing is listening on this port.
    let service = service_against("http://127.0.0.1:9");

    let result = service.handle(&request_for(ENTRY)).await.unwrap();
    assert_eq!(result, heuristic::generate("", ENTRY));
}

#[tokio::test]
async fn goal_reaches_the_provider_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(wiremock::matchers::body_string_contains("Goal: Ship the MVP"))
        .respond_with(completion_with_content(r#"{"reflection":"On track."}"#))
        .expect(1)
        .mount(&server)
        .await;

    let external =
        OpenAiStrategy::with_base_url(&server.uri(), "test-key", Duration::from_secs(5));
    let result = external.try_generate("Ship the MVP", "Wrote the spec.").await;

    assert_eq!(result.unwrap().reflection, "On track.");
    server.verify().await;
}

#[tokio::test]
async fn absent_goal_is_marked_in_the_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(wiremock::matchers::body_string_contains("Goal: (none provided)"))
        .respond_with(completion_with_content(r#"{"reflection":"Ok."}"#))
        .expect(1)
        .mount(&server)
        .await;

    let external =
        OpenAiStrategy::with_base_url(&server.uri(), "test-key", Duration::from_secs(5));
    let result = external.try_generate("", "Wrote the spec.").await;

    assert!(result.is_some());
    server.verify().await;
}
