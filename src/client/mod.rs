mod client_impl;
mod config;
mod factory;

pub use client_impl::FinetuneClientImpl;
pub use config::{
    ApiFlavor, FinetuneConfig, ManagementConfig, DEFAULT_AZURE_API_VERSION, DEFAULT_BASE_URL,
    DEFAULT_MANAGEMENT_API_VERSION, DEFAULT_MANAGEMENT_URL,
};
pub use factory::FinetuneClientBuilder;

use crate::errors::FinetuneResult;
use crate::services::{
    chat::ChatCompletionService, files::FileService, fine_tuning::FineTuningService,
    models::ModelService,
};
use async_trait::async_trait;

/// Data plane entry point: one transport, one credential, one retry policy
/// shared by every service.
#[async_trait]
pub trait FinetuneClient: Send + Sync {
    fn chat(&self) -> &dyn ChatCompletionService;
    fn files(&self) -> &dyn FileService;
    fn fine_tuning(&self) -> &dyn FineTuningService;
    fn models(&self) -> &dyn ModelService;

    async fn health_check(&self) -> FinetuneResult<bool>;
}
