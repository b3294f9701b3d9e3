use super::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClassifierConfig {
    ClassifierConfig {
        api_url: format!("{}/openai/v1/chat/completions", server.uri()),
        ..Default::default()
    }
}

#[test]
fn test_build_request() {
    let client = ChatClient::new(&ClassifierConfig::default()).unwrap();
    let request = client.build_request("Hiring a GenAI engineer");
    assert_eq!(request.model, "gemma2-9b-it");
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
    assert!(request.messages[1].content.starts_with("LinkedIn Post:\n\nHiring a GenAI engineer\n\n"));
    assert!(request.messages[1].content.ends_with("AI_JOB_POST, or GENERAL_POST."));
}

#[tokio::test]
async fn test_complete_sends_bearer_and_returns_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .and(header("Authorization", "Bearer gsk-test"))
        .and(body_partial_json(json!({"model": "gemma2-9b-it"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "AI_JOB_POST"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatClient::new(&config_for(&server)).unwrap();
    let output = client.complete("gsk-test", "We're hiring ML engineers").await.unwrap();
    assert_eq!(output, "AI_JOB_POST");
}

#[tokio::test]
async fn test_complete_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = ChatClient::new(&config_for(&server)).unwrap();
    match client.complete("key", "post").await {
        Err(ClassifierError::ApiError { status, message }) => {
            assert_eq!(status, 429);
            assert_eq!(message, "rate limited");
        }
        other => panic!("Expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_complete_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = ChatClient::new(&config_for(&server)).unwrap();
    let result = client.complete("key", "post").await;
    assert!(matches!(result, Err(ClassifierError::InvalidResponse(_))));
}
