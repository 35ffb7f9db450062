use crate::auth::AuthProvider;
use crate::errors::{AuthenticationError, FinetuneError, FinetuneResult};
use async_trait::async_trait;
use http::header::{HeaderValue, AUTHORIZATION};
use http::HeaderMap;
use secrecy::{ExposeSecret, SecretString};

/// Pre-acquired OAuth bearer token, as issued for the Azure management plane.
pub struct BearerTokenProvider {
    token: SecretString,
}

impl BearerTokenProvider {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

#[async_trait]
impl AuthProvider for BearerTokenProvider {
    async fn authenticate(&self, headers: &mut HeaderMap) -> FinetuneResult<()> {
        let token = self.token.expose_secret().trim();
        if token.is_empty() {
            return Err(FinetuneError::Authentication(
                AuthenticationError::InvalidBearerToken("token is empty".to_string()),
            ));
        }

        let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            FinetuneError::Authentication(AuthenticationError::InvalidBearerToken(
                "token contains characters not allowed in a header".to_string(),
            ))
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        Ok(())
    }

    fn is_valid(&self) -> bool {
        !self.token.expose_secret().trim().is_empty()
    }
}
