use crate::auth::AuthManager;
use crate::client::ApiFlavor;
use crate::errors::FinetuneResult;
use crate::resilience::ResilienceOrchestrator;
use crate::services::chat::{ChatCompletionRequest, ChatCompletionResponse, ChatRequestValidator};
use crate::transport::{HttpTransport, ResponseParser};
use async_trait::async_trait;
use http::{HeaderMap, Method};
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCompletionService: Send + Sync {
    async fn create(&self, request: ChatCompletionRequest)
        -> FinetuneResult<ChatCompletionResponse>;
}

pub struct ChatCompletionServiceImpl {
    transport: Arc<dyn HttpTransport>,
    auth_manager: Arc<dyn AuthManager>,
    resilience: Arc<ResilienceOrchestrator>,
    flavor: ApiFlavor,
}

impl ChatCompletionServiceImpl {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
        resilience: Arc<ResilienceOrchestrator>,
    ) -> Self {
        Self {
            transport,
            auth_manager,
            resilience,
            flavor: ApiFlavor::OpenAI,
        }
    }

    pub fn with_flavor(mut self, flavor: ApiFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    /// Azure addresses chat by deployment name; `model` carries that name.
    fn completions_path(&self, model: &str) -> String {
        match self.flavor {
            ApiFlavor::OpenAI => "/chat/completions".to_string(),
            ApiFlavor::Azure => format!("/deployments/{}/chat/completions", model),
        }
    }
}

#[async_trait]
impl ChatCompletionService for ChatCompletionServiceImpl {
    async fn create(
        &self,
        request: ChatCompletionRequest,
    ) -> FinetuneResult<ChatCompletionResponse> {
        ChatRequestValidator::validate(&request)?;

        let mut headers = HeaderMap::new();
        self.auth_manager.apply_auth(&mut headers).await?;

        let path = self.completions_path(&request.model);
        let body = serde_json::to_value(&request)?;

        let transport = &self.transport;
        let (path, body, headers) = (path.as_str(), &body, &headers);
        let value = self
            .resilience
            .execute("chat.create", move || async move {
                transport
                    .send_json(Method::POST, path, Some(body), headers)
                    .await
            })
            .await?;

        ResponseParser::from_value(value)
    }
}
