mod api_key;
mod auth_manager;
mod bearer;

pub use api_key::{ApiKeyProvider, KeyPlacement};
pub use auth_manager::{AuthManager, DefaultAuthManager};
pub use bearer::BearerTokenProvider;

use crate::errors::FinetuneResult;
use async_trait::async_trait;
use http::HeaderMap;

/// Source of request credentials.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Adds the credential headers to `headers`.
    async fn authenticate(&self, headers: &mut HeaderMap) -> FinetuneResult<()>;

    fn is_valid(&self) -> bool;
}
