//! Chat completions against OpenAI and Azure flavored endpoints

use super::*;
use integrations_finetune::prelude::*;
use integrations_finetune::FinetuneError;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};

#[tokio::test]
async fn test_chat_completion_openai_success() {
    let server = setup_mock_server().await;

    mock_with_auth("POST", "/chat/completions")
        .and(body_partial_json(json!({
            "model": "gpt-4o-2024-08-06",
            "messages": [{ "role": "user", "content": "What colour is the car?" }]
        })))
        .respond_with(success_response(chat_body("Red")))
        .expect(1)
        .mount(&server)
        .await;

    let client = openai_client(&server);
    let request = ChatCompletionRequest::new(
        "gpt-4o-2024-08-06",
        vec![ChatMessage::user("What colour is the car?")],
    );

    let response = client.chat().create(request).await.unwrap();

    assert_eq!(response.id, "chatcmpl-integration-123");
    assert_eq!(response.first_text().as_deref(), Some("Red"));
}

#[tokio::test]
async fn test_chat_completion_azure_routes_by_deployment() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/openai/deployments/vqa-ft/chat/completions"))
        .and(query_param("api-version", "2024-10-21"))
        .and(header("api-key", "azure-key"))
        .respond_with(success_response(chat_body("Two")))
        .expect(1)
        .mount(&server)
        .await;

    let config = FinetuneConfig::azure(&server.uri(), "azure-key")
        .unwrap()
        .with_retry(fast_retry());
    let client = FinetuneClientBuilder::new().with_config(config).build().unwrap();

    let request = ChatCompletionRequest::new(
        "vqa-ft",
        vec![ChatMessage::user("How many dogs are there?")],
    );
    let response = client.chat().create(request).await.unwrap();

    assert_eq!(response.first_text().as_deref(), Some("Two"));
}

#[tokio::test]
async fn test_chat_completion_authentication_error() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(error_response(401, "invalid_api_key", "Invalid API key"))
        .mount(&server)
        .await;

    let client = openai_client(&server);
    let request = ChatCompletionRequest::new("gpt-4o", vec![ChatMessage::user("Test")]);

    let result = client.chat().create(request).await;

    assert!(matches!(result, Err(FinetuneError::Authentication(_))));
}

#[tokio::test]
async fn test_chat_completion_retries_rate_limit_then_succeeds() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(error_response(429, "rate_limit_exceeded", "Rate limit exceeded"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(success_response(chat_body("Yes")))
        .expect(1)
        .mount(&server)
        .await;

    let client = openai_client(&server);
    let request = ChatCompletionRequest::new("gpt-4o", vec![ChatMessage::user("Test")]);

    let response = client.chat().create(request).await.unwrap();

    assert_eq!(response.first_text().as_deref(), Some("Yes"));
}

#[tokio::test]
async fn test_chat_completion_gives_up_after_max_attempts() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(error_response(503, "overloaded", "Service unavailable"))
        .expect(3)
        .mount(&server)
        .await;

    let client = openai_client(&server);
    let request = ChatCompletionRequest::new("gpt-4o", vec![ChatMessage::user("Test")]);

    let error = client.chat().create(request).await.unwrap_err();

    assert_eq!(error.status_code(), Some(503));
}
