//! Mock authentication for testing

use crate::auth::AuthManager;
use crate::errors::{AuthenticationError, FinetuneError, FinetuneResult};
use async_trait::async_trait;
use http::HeaderMap;

/// Adds a fixed bearer header, or fails with the configured message.
#[derive(Clone, Default)]
pub struct MockAuthManager {
    error: Option<String>,
}

impl MockAuthManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
}

#[async_trait]
impl AuthManager for MockAuthManager {
    async fn apply_auth(&self, headers: &mut HeaderMap) -> FinetuneResult<()> {
        if let Some(message) = &self.error {
            return Err(FinetuneError::Authentication(
                AuthenticationError::InvalidApiKey(message.clone()),
            ));
        }
        headers.insert("Authorization", "Bearer test-key".parse().unwrap());
        Ok(())
    }

    fn validate(&self) -> FinetuneResult<()> {
        Ok(())
    }
}
