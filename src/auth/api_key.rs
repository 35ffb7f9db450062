use crate::auth::AuthProvider;
use crate::errors::{AuthenticationError, FinetuneError, FinetuneResult};
use async_trait::async_trait;
use http::header::{HeaderValue, AUTHORIZATION};
use http::HeaderMap;
use secrecy::{ExposeSecret, SecretString};

/// Where the API key travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPlacement {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `api-key: <key>`
    ApiKeyHeader,
}

/// Static API key credential for the data plane.
pub struct ApiKeyProvider {
    api_key: SecretString,
    placement: KeyPlacement,
    organization_id: Option<String>,
}

impl ApiKeyProvider {
    pub fn new(api_key: impl Into<String>, placement: KeyPlacement) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            placement,
            organization_id: None,
        }
    }

    pub fn with_organization(mut self, org_id: impl Into<String>) -> Self {
        self.organization_id = Some(org_id.into());
        self
    }

    fn sensitive_value(raw: &str) -> FinetuneResult<HeaderValue> {
        let mut value = HeaderValue::from_str(raw).map_err(|_| {
            FinetuneError::Authentication(AuthenticationError::InvalidApiKey(
                "API key contains characters not allowed in a header".to_string(),
            ))
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

#[async_trait]
impl AuthProvider for ApiKeyProvider {
    async fn authenticate(&self, headers: &mut HeaderMap) -> FinetuneResult<()> {
        let api_key = self.api_key.expose_secret();
        if api_key.trim().is_empty() {
            return Err(FinetuneError::Authentication(
                AuthenticationError::InvalidApiKey("API key is empty".to_string()),
            ));
        }

        match self.placement {
            KeyPlacement::Bearer => {
                headers.insert(
                    AUTHORIZATION,
                    Self::sensitive_value(&format!("Bearer {}", api_key))?,
                );
            }
            KeyPlacement::ApiKeyHeader => {
                headers.insert("api-key", Self::sensitive_value(api_key)?);
            }
        }

        if let Some(org_id) = &self.organization_id {
            headers.insert(
                "OpenAI-Organization",
                org_id.parse().map_err(|_| {
                    FinetuneError::Authentication(AuthenticationError::InvalidOrganizationId(
                        "Invalid organization ID format".to_string(),
                    ))
                })?,
            );
        }

        Ok(())
    }

    fn is_valid(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }
}
