use crate::auth::AuthManager;
use crate::client::{FinetuneClient, FinetuneConfig};
use crate::errors::FinetuneResult;
use crate::resilience::ResilienceOrchestrator;
use crate::services::{
    chat::{ChatCompletionService, ChatCompletionServiceImpl},
    files::{FileService, FileServiceImpl},
    fine_tuning::{FineTuningService, FineTuningServiceImpl},
    models::{ModelService, ModelServiceImpl},
};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use std::sync::Arc;

pub struct FinetuneClientImpl {
    config: FinetuneConfig,
    chat_service: ChatCompletionServiceImpl,
    files_service: FileServiceImpl,
    fine_tuning_service: FineTuningServiceImpl,
    models_service: ModelServiceImpl,
}

impl FinetuneClientImpl {
    pub fn new(
        config: FinetuneConfig,
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
        resilience: Arc<ResilienceOrchestrator>,
    ) -> Self {
        let chat_service = ChatCompletionServiceImpl::new(
            transport.clone(),
            auth_manager.clone(),
            resilience.clone(),
        )
        .with_flavor(config.flavor);

        let files_service = FileServiceImpl::new(
            transport.clone(),
            auth_manager.clone(),
            resilience.clone(),
        );

        let fine_tuning_service = FineTuningServiceImpl::new(
            transport.clone(),
            auth_manager.clone(),
            resilience.clone(),
        );

        let models_service = ModelServiceImpl::new(transport, auth_manager, resilience);

        Self {
            config,
            chat_service,
            files_service,
            fine_tuning_service,
            models_service,
        }
    }

    pub fn config(&self) -> &FinetuneConfig {
        &self.config
    }
}

#[async_trait]
impl FinetuneClient for FinetuneClientImpl {
    fn chat(&self) -> &dyn ChatCompletionService {
        &self.chat_service
    }

    fn files(&self) -> &dyn FileService {
        &self.files_service
    }

    fn fine_tuning(&self) -> &dyn FineTuningService {
        &self.fine_tuning_service
    }

    fn models(&self) -> &dyn ModelService {
        &self.models_service
    }

    async fn health_check(&self) -> FinetuneResult<bool> {
        self.models_service.list().await.map(|_| true)
    }
}
