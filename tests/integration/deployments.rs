//! Management-plane deployment calls

use integrations_finetune::services::deployments::ProvisioningState;
use integrations_finetune::{
    DeploymentRequest, DeploymentService, DeploymentServiceImpl, FinetuneError, ManagementConfig,
};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DEPLOYMENT_PATH: &str = "/subscriptions/sub-123/resourceGroups/rg-vqa/providers/Microsoft.CognitiveServices/accounts/acct-vqa/deployments/vqa-ft";

fn management_config(server: &MockServer) -> ManagementConfig {
    ManagementConfig::new("arm-token", "sub-123", "rg-vqa", "acct-vqa")
        .with_endpoint(Url::parse(&server.uri()).unwrap())
        .with_retry(super::fast_retry())
}

fn deployment_body(state: &str) -> serde_json::Value {
    json!({
        "id": DEPLOYMENT_PATH,
        "name": "vqa-ft",
        "type": "Microsoft.CognitiveServices/accounts/deployments",
        "sku": { "name": "standard", "capacity": 2 },
        "properties": {
            "model": {
                "format": "OpenAI",
                "name": "ft:gpt-4o-2024-08-06:org-test:vqa:abc123",
                "version": "1"
            },
            "provisioningState": state
        }
    })
}

#[tokio::test]
async fn test_create_or_update_puts_deployment_with_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(DEPLOYMENT_PATH))
        .and(query_param("api-version", "2023-05-01"))
        .and(header("Authorization", "Bearer arm-token"))
        .and(body_json(json!({
            "sku": { "name": "standard", "capacity": 2 },
            "properties": {
                "model": {
                    "format": "OpenAI",
                    "name": "ft:gpt-4o-2024-08-06:org-test:vqa:abc123",
                    "version": "1"
                }
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(deployment_body("Creating")))
        .expect(1)
        .mount(&server)
        .await;

    let service = DeploymentServiceImpl::from_config(&management_config(&server)).unwrap();
    let request =
        DeploymentRequest::for_model("ft:gpt-4o-2024-08-06:org-test:vqa:abc123").with_capacity(2);

    let deployment = service.create_or_update("vqa-ft", request).await.unwrap();

    assert_eq!(deployment.name, "vqa-ft");
    assert_eq!(deployment.provisioning_state(), Some(ProvisioningState::Creating));
}

#[tokio::test]
async fn test_create_or_update_retries_throttling() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(DEPLOYMENT_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": "TooManyRequests", "message": "Throttled" }
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(DEPLOYMENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(deployment_body("Succeeded")))
        .expect(1)
        .mount(&server)
        .await;

    let service = DeploymentServiceImpl::from_config(&management_config(&server)).unwrap();
    let request = DeploymentRequest::for_model("ft:gpt-4o-2024-08-06:org-test:vqa:abc123");
    let deployment = service.create_or_update("vqa-ft", request).await.unwrap();

    assert_eq!(deployment.provisioning_state(), Some(ProvisioningState::Succeeded));
}

#[tokio::test]
async fn test_retrieve_deployment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DEPLOYMENT_PATH))
        .and(header("Authorization", "Bearer arm-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(deployment_body("Succeeded")))
        .mount(&server)
        .await;

    let service = DeploymentServiceImpl::from_config(&management_config(&server)).unwrap();
    let deployment = service.retrieve("vqa-ft").await.unwrap();

    assert!(deployment.provisioning_state().unwrap().is_terminal());
}

#[tokio::test]
async fn test_empty_token_is_rejected_before_any_request() {
    let config = ManagementConfig::new("  ", "sub-123", "rg-vqa", "acct-vqa");

    let result = DeploymentServiceImpl::from_config(&config);

    assert!(matches!(result, Err(FinetuneError::Configuration(_))));
}
