//! Integration tests using WireMock
//!
//! These exercise the full request/response cycle against a mock HTTP
//! server: URL construction, authentication headers, multipart uploads,
//! retries and response parsing.

mod chat;
mod deployments;
mod files;
mod fine_tuning;
mod pipeline;

use integrations_finetune::client::{FinetuneClient, FinetuneClientBuilder, FinetuneConfig};
use integrations_finetune::RetryPolicy;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Short fixed delay so retry tests stay fast.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::fixed(3, Duration::from_millis(10))
}

pub fn openai_config(server: &MockServer) -> FinetuneConfig {
    FinetuneConfig::new(TEST_API_KEY)
        .with_base_url(Url::parse(&server.uri()).expect("mock server uri"))
        .with_retry(fast_retry())
}

pub fn openai_client(server: &MockServer) -> Arc<dyn FinetuneClient> {
    FinetuneClientBuilder::new()
        .with_config(openai_config(server))
        .build()
        .expect("Failed to build client")
}

/// Mock for an authenticated OpenAI-flavored call.
pub fn mock_with_auth(method_matcher: &str, path_matcher: &str) -> MockBuilder {
    Mock::given(method(method_matcher))
        .and(path(path_matcher))
        .and(header("Authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
}

pub fn success_response(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn error_response(status: u16, code: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": {
            "message": message,
            "type": "invalid_request_error",
            "code": code
        }
    }))
}

pub fn file_body(id: &str, filename: &str, purpose: &str) -> Value {
    json!({
        "id": id,
        "object": "file",
        "bytes": 1024,
        "created_at": 1700000000,
        "filename": filename,
        "purpose": purpose,
        "status": "processed"
    })
}

pub fn job_body(id: &str, status: &str) -> Value {
    let mut job = json!({
        "id": id,
        "object": "fine_tuning.job",
        "created_at": 1700000000,
        "finished_at": null,
        "model": "gpt-4o-2024-08-06",
        "fine_tuned_model": null,
        "organization_id": "org-test",
        "status": status,
        "hyperparameters": { "n_epochs": 3 },
        "training_file": "file-train",
        "validation_file": "file-valid",
        "result_files": [],
        "trained_tokens": null,
        "seed": 42
    });
    if status == "succeeded" {
        job["fine_tuned_model"] = json!("ft:gpt-4o-2024-08-06:org-test:vqa:abc123");
        job["finished_at"] = json!(1700003600);
        job["result_files"] = json!(["file-results"]);
        job["trained_tokens"] = json!(52000);
    }
    if status == "failed" {
        job["error"] = json!({
            "code": "invalid_training_file",
            "message": "Training file has invalid format",
            "param": "training_file"
        });
    }
    job
}

pub fn chat_body(text: &str) -> Value {
    json!({
        "id": "chatcmpl-integration-123",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "gpt-4o-2024-08-06",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
    })
}
