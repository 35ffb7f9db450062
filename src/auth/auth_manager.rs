use crate::auth::{ApiKeyProvider, AuthProvider, BearerTokenProvider, KeyPlacement};
use crate::client::{ApiFlavor, FinetuneConfig, ManagementConfig};
use crate::errors::{AuthenticationError, FinetuneError, FinetuneResult};
use async_trait::async_trait;
use http::HeaderMap;
use std::sync::Arc;

/// Applies credentials to outgoing requests.
#[async_trait]
pub trait AuthManager: Send + Sync {
    async fn apply_auth(&self, headers: &mut HeaderMap) -> FinetuneResult<()>;

    fn validate(&self) -> FinetuneResult<()>;
}

pub struct DefaultAuthManager {
    provider: Arc<dyn AuthProvider>,
}

impl DefaultAuthManager {
    /// Data plane credentials: bearer for OpenAI, `api-key` header for Azure.
    pub fn new(config: &FinetuneConfig) -> Self {
        let placement = match config.flavor {
            ApiFlavor::OpenAI => KeyPlacement::Bearer,
            ApiFlavor::Azure => KeyPlacement::ApiKeyHeader,
        };
        let mut provider = ApiKeyProvider::new(config.api_key().to_string(), placement);
        if let Some(org_id) = &config.organization_id {
            provider = provider.with_organization(org_id.clone());
        }

        Self::with_provider(Arc::new(provider))
    }

    /// Management plane credentials.
    pub fn management(config: &ManagementConfig) -> Self {
        Self::with_provider(Arc::new(BearerTokenProvider::new(config.token.clone())))
    }

    pub fn with_provider(provider: Arc<dyn AuthProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl AuthManager for DefaultAuthManager {
    async fn apply_auth(&self, headers: &mut HeaderMap) -> FinetuneResult<()> {
        self.provider.authenticate(headers).await
    }

    fn validate(&self) -> FinetuneResult<()> {
        if !self.provider.is_valid() {
            return Err(FinetuneError::Authentication(
                AuthenticationError::InvalidApiKey("credential validation failed".to_string()),
            ));
        }
        Ok(())
    }
}
