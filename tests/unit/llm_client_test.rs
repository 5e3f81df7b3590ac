use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gurumi_server::services::llm_client::{LlmClient, LlmError};

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"content": content}}]
    }))
}

#[derive(Debug, Deserialize)]
struct Keywords {
    keywords: Vec<String>,
}

#[tokio::test]
async fn complete_returns_the_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(completion("안녕!"))
        .mount(&server)
        .await;

    let client = LlmClient::new(&server.uri(), "sk-test", "test-model");
    let reply = client.complete("system", "user").await.unwrap();
    assert_eq!(reply, "안녕!");
}

#[tokio::test]
async fn complete_surfaces_api_errors_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = LlmClient::new(&server.uri(), "sk-test", "test-model");
    let err = client.complete("system", "user").await.unwrap_err();
    match err {
        LlmError::Api { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "rate limited");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_completions_are_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = LlmClient::new(&server.uri(), "sk-test", "test-model");
    let err = client.complete("system", "user").await.unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse));
}

#[tokio::test]
async fn call_json_parses_fenced_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion("```json\n{\"keywords\": [\"여행\"]}\n```"))
        .mount(&server)
        .await;

    let client = LlmClient::new(&server.uri(), "sk-test", "test-model");
    let parsed: Keywords = client.call_json("system", "user").await.unwrap();
    assert_eq!(parsed.keywords, vec!["여행"]);
}

#[tokio::test]
async fn call_json_repairs_a_malformed_first_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("extract keywords"))
        .respond_with(completion("the keywords are: travel"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("fix malformed JSON"))
        .respond_with(completion("{\"keywords\": [\"travel\"]}"))
        .mount(&server)
        .await;

    let client = LlmClient::new(&server.uri(), "sk-test", "test-model");
    let parsed: Keywords = client.call_json("extract keywords", "user").await.unwrap();
    assert_eq!(parsed.keywords, vec!["travel"]);
}

#[tokio::test]
async fn call_json_gives_up_after_one_repair_round() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion("never json"))
        .expect(2)
        .mount(&server)
        .await;

    let client = LlmClient::new(&server.uri(), "sk-test", "test-model");
    let err = client
        .call_json::<Keywords>("system", "user")
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::InvalidJson { .. }));
}
