use crate::auth::{AuthManager, DefaultAuthManager};
use crate::client::{FinetuneClient, FinetuneClientImpl, FinetuneConfig};
use crate::errors::{ConfigurationError, FinetuneError, FinetuneResult};
use crate::resilience::ResilienceOrchestrator;
use crate::transport::{HttpTransport, ReqwestTransport};
use std::sync::Arc;

pub struct FinetuneClientBuilder {
    config: Option<FinetuneConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
    auth_manager: Option<Arc<dyn AuthManager>>,
    resilience: Option<Arc<ResilienceOrchestrator>>,
}

impl FinetuneClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            transport: None,
            auth_manager: None,
            resilience: None,
        }
    }

    pub fn with_config(mut self, config: FinetuneConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config = Some(FinetuneConfig::new(api_key));
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_auth_manager(mut self, auth_manager: Arc<dyn AuthManager>) -> Self {
        self.auth_manager = Some(auth_manager);
        self
    }

    pub fn with_resilience(mut self, resilience: Arc<ResilienceOrchestrator>) -> Self {
        self.resilience = Some(resilience);
        self
    }

    pub fn build(self) -> FinetuneResult<Arc<dyn FinetuneClient>> {
        let config = self.config.ok_or_else(|| {
            FinetuneError::Configuration(ConfigurationError::MissingApiKey(
                "API key must be provided".to_string(),
            ))
        })?;
        config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&config)?),
        };

        let auth_manager = self
            .auth_manager
            .unwrap_or_else(|| Arc::new(DefaultAuthManager::new(&config)));

        let resilience = self
            .resilience
            .unwrap_or_else(|| Arc::new(ResilienceOrchestrator::new(config.retry.clone())));

        tracing::debug!(
            base_url = %config.base_url,
            flavor = ?config.flavor,
            max_attempts = config.retry.max_attempts,
            "building client"
        );

        Ok(Arc::new(FinetuneClientImpl::new(
            config,
            transport,
            auth_manager,
            resilience,
        )))
    }
}

impl Default for FinetuneClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
