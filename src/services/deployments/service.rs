use crate::auth::{AuthManager, DefaultAuthManager};
use crate::client::ManagementConfig;
use crate::errors::{FinetuneError, FinetuneResult, ValidationError};
use crate::resilience::ResilienceOrchestrator;
use crate::services::deployments::{Deployment, DeploymentRequest};
use crate::transport::{HttpTransport, ReqwestTransport, ResponseParser};
use async_trait::async_trait;
use http::{HeaderMap, Method};
use std::sync::Arc;

/// Deployments on the management plane, authenticated with a bearer token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeploymentService: Send + Sync {
    async fn create_or_update(
        &self,
        name: &str,
        request: DeploymentRequest,
    ) -> FinetuneResult<Deployment>;
    async fn retrieve(&self, name: &str) -> FinetuneResult<Deployment>;
}

pub struct DeploymentServiceImpl {
    transport: Arc<dyn HttpTransport>,
    auth_manager: Arc<dyn AuthManager>,
    resilience: Arc<ResilienceOrchestrator>,
    account_path: String,
}

impl DeploymentServiceImpl {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
        resilience: Arc<ResilienceOrchestrator>,
        account_path: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            auth_manager,
            resilience,
            account_path: account_path.into(),
        }
    }

    pub fn from_config(config: &ManagementConfig) -> FinetuneResult<Self> {
        config.validate()?;
        Ok(Self::new(
            Arc::new(ReqwestTransport::management(config)?),
            Arc::new(DefaultAuthManager::management(config)),
            Arc::new(ResilienceOrchestrator::new(config.retry.clone())),
            config.account_path(),
        ))
    }

    fn deployment_path(&self, name: &str) -> FinetuneResult<String> {
        if name.trim().is_empty() || name.contains('/') {
            return Err(FinetuneError::Validation(ValidationError::InvalidParameter {
                parameter: "name".to_string(),
                reason: "deployment name must be non-empty and contain no '/'".to_string(),
            }));
        }
        Ok(format!("{}/deployments/{}", self.account_path, name))
    }
}

#[async_trait]
impl DeploymentService for DeploymentServiceImpl {
    async fn create_or_update(
        &self,
        name: &str,
        request: DeploymentRequest,
    ) -> FinetuneResult<Deployment> {
        let path = self.deployment_path(name)?;

        let mut headers = HeaderMap::new();
        self.auth_manager.apply_auth(&mut headers).await?;

        tracing::info!(
            deployment = name,
            model = %request.properties.model.name,
            sku = %request.sku.name,
            capacity = request.sku.capacity,
            "creating deployment"
        );

        let body = serde_json::to_value(&request)?;
        let transport = &self.transport;
        let (path, body, headers) = (path.as_str(), &body, &headers);
        let value = self
            .resilience
            .execute("deployments.create_or_update", move || async move {
                transport
                    .send_json(Method::PUT, path, Some(body), headers)
                    .await
            })
            .await?;

        ResponseParser::from_value(value)
    }

    async fn retrieve(&self, name: &str) -> FinetuneResult<Deployment> {
        let path = self.deployment_path(name)?;

        let mut headers = HeaderMap::new();
        self.auth_manager.apply_auth(&mut headers).await?;

        let transport = &self.transport;
        let (path, headers) = (path.as_str(), &headers);
        let value = self
            .resilience
            .execute("deployments.retrieve", move || async move {
                transport.send_json(Method::GET, path, None, headers).await
            })
            .await?;

        ResponseParser::from_value(value)
    }
}
