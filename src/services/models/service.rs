use crate::auth::AuthManager;
use crate::errors::FinetuneResult;
use crate::resilience::ResilienceOrchestrator;
use crate::services::models::{Model, ModelListResponse};
use crate::transport::{HttpTransport, ResponseParser};
use async_trait::async_trait;
use http::{HeaderMap, Method};
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelService: Send + Sync {
    async fn list(&self) -> FinetuneResult<ModelListResponse>;
    async fn retrieve(&self, model_id: &str) -> FinetuneResult<Model>;
}

pub struct ModelServiceImpl {
    transport: Arc<dyn HttpTransport>,
    auth_manager: Arc<dyn AuthManager>,
    resilience: Arc<ResilienceOrchestrator>,
}

impl ModelServiceImpl {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
        resilience: Arc<ResilienceOrchestrator>,
    ) -> Self {
        Self {
            transport,
            auth_manager,
            resilience,
        }
    }

    async fn get(&self, operation: &str, path: &str) -> FinetuneResult<serde_json::Value> {
        let mut headers = HeaderMap::new();
        self.auth_manager.apply_auth(&mut headers).await?;

        let transport = &self.transport;
        let headers = &headers;
        self.resilience
            .execute(operation, move || async move {
                transport.send_json(Method::GET, path, None, headers).await
            })
            .await
    }
}

#[async_trait]
impl ModelService for ModelServiceImpl {
    async fn list(&self) -> FinetuneResult<ModelListResponse> {
        let value = self.get("models.list", "/models").await?;
        ResponseParser::from_value(value)
    }

    async fn retrieve(&self, model_id: &str) -> FinetuneResult<Model> {
        let path = format!("/models/{}", model_id);
        let value = self.get("models.retrieve", &path).await?;
        ResponseParser::from_value(value)
    }
}
