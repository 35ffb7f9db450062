use crate::auth::AuthManager;
use crate::errors::FinetuneResult;
use crate::resilience::ResilienceOrchestrator;
use crate::services::fine_tuning::{
    FineTuningCheckpointListResponse, FineTuningEventListResponse, FineTuningJob,
    FineTuningJobListResponse, FineTuningJobRequest, FineTuningRequestValidator,
};
use crate::transport::{with_query, HttpTransport, ResponseParser};
use async_trait::async_trait;
use http::{HeaderMap, Method};
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FineTuningService: Send + Sync {
    async fn create(&self, request: FineTuningJobRequest) -> FinetuneResult<FineTuningJob>;
    async fn list(
        &self,
        limit: Option<u32>,
        after: Option<String>,
    ) -> FinetuneResult<FineTuningJobListResponse>;
    async fn retrieve(&self, job_id: &str) -> FinetuneResult<FineTuningJob>;
    async fn cancel(&self, job_id: &str) -> FinetuneResult<FineTuningJob>;
    async fn events(
        &self,
        job_id: &str,
        limit: Option<u32>,
        after: Option<String>,
    ) -> FinetuneResult<FineTuningEventListResponse>;
    async fn checkpoints(&self, job_id: &str) -> FinetuneResult<FineTuningCheckpointListResponse>;
}

pub struct FineTuningServiceImpl {
    transport: Arc<dyn HttpTransport>,
    auth_manager: Arc<dyn AuthManager>,
    resilience: Arc<ResilienceOrchestrator>,
}

impl FineTuningServiceImpl {
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

    async fn call(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> FinetuneResult<serde_json::Value> {
        let mut headers = HeaderMap::new();
        self.auth_manager.apply_auth(&mut headers).await?;

        let transport = &self.transport;
        let (headers, body, method) = (&headers, body.as_ref(), &method);
        self.resilience
            .execute(operation, move || async move {
                transport
                    .send_json(method.clone(), path, body, headers)
                    .await
            })
            .await
    }
}

#[async_trait]
impl FineTuningService for FineTuningServiceImpl {
    async fn create(&self, request: FineTuningJobRequest) -> FinetuneResult<FineTuningJob> {
        FineTuningRequestValidator::validate(&request)?;

        let body = serde_json::to_value(&request)?;
        let value = self
            .call("fine_tuning.create", Method::POST, "/fine_tuning/jobs", Some(body))
            .await?;

        let job: FineTuningJob = ResponseParser::from_value(value)?;
        tracing::info!(job_id = %job.id, model = %job.model, status = %job.status, "fine-tuning job created");
        Ok(job)
    }

    async fn list(
        &self,
        limit: Option<u32>,
        after: Option<String>,
    ) -> FinetuneResult<FineTuningJobListResponse> {
        let path = with_query(
            "/fine_tuning/jobs",
            &[("limit", limit.map(|l| l.to_string())), ("after", after)],
        );
        let value = self.call("fine_tuning.list", Method::GET, &path, None).await?;
        ResponseParser::from_value(value)
    }

    async fn retrieve(&self, job_id: &str) -> FinetuneResult<FineTuningJob> {
        let path = format!("/fine_tuning/jobs/{}", job_id);
        let value = self.call("fine_tuning.retrieve", Method::GET, &path, None).await?;
        ResponseParser::from_value(value)
    }

    async fn cancel(&self, job_id: &str) -> FinetuneResult<FineTuningJob> {
        let path = format!("/fine_tuning/jobs/{}/cancel", job_id);
        let value = self.call("fine_tuning.cancel", Method::POST, &path, None).await?;
        ResponseParser::from_value(value)
    }

    async fn events(
        &self,
        job_id: &str,
        limit: Option<u32>,
        after: Option<String>,
    ) -> FinetuneResult<FineTuningEventListResponse> {
        let path = with_query(
            &format!("/fine_tuning/jobs/{}/events", job_id),
            &[("limit", limit.map(|l| l.to_string())), ("after", after)],
        );
        let value = self.call("fine_tuning.events", Method::GET, &path, None).await?;
        ResponseParser::from_value(value)
    }

    async fn checkpoints(&self, job_id: &str) -> FinetuneResult<FineTuningCheckpointListResponse> {
        let path = format!("/fine_tuning/jobs/{}/checkpoints", job_id);
        let value = self
            .call("fine_tuning.checkpoints", Method::GET, &path, None)
            .await?;
        ResponseParser::from_value(value)
    }
}
