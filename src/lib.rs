//! Scripted fine-tuning workflow against an OpenAI-compatible API.
//!
//! The remote service does the training, inference and storage. This crate
//! provides the client ([`FinetuneClient`]) with bounded retries around every
//! call, a management-plane [`DeploymentService`], and the local
//! [`pipeline`] glue: dataset conversion to chat JSONL, job submission and
//! polling, metrics smoothing and plotting, and a prediction-plus-judge
//! evaluation harness.

pub mod auth;
pub mod client;
pub mod errors;
pub mod observability;
pub mod pipeline;
pub mod resilience;
pub mod services;
pub mod transport;
pub mod types;

#[cfg(test)]
pub mod mocks;

pub use client::{
    ApiFlavor, FinetuneClient, FinetuneClientBuilder, FinetuneClientImpl, FinetuneConfig,
    ManagementConfig,
};
pub use errors::{FinetuneError, FinetuneResult};
pub use resilience::{retry_with_policy, ResilienceOrchestrator, RetryPolicy};

pub use services::{
    chat::{ChatCompletionRequest, ChatCompletionResponse, ChatCompletionService, ChatMessage},
    deployments::{Deployment, DeploymentRequest, DeploymentService, DeploymentServiceImpl},
    files::{FileObject, FilePurpose, FileService, FileUploadRequest},
    fine_tuning::{FineTuningJob, FineTuningJobRequest, FineTuningJobStatus, FineTuningService},
    models::{Model, ModelService},
};

pub mod prelude {
    pub use crate::client::{FinetuneClient, FinetuneClientBuilder, FinetuneConfig};
    pub use crate::errors::{FinetuneError, FinetuneResult};
    pub use crate::pipeline::{
        DatasetConverter, EvalCase, EvaluationHarness, JobPoller, JobSubmission, SourceRow,
    };
    pub use crate::services::chat::{ChatCompletionRequest, ChatCompletionService, ChatMessage};
    pub use crate::services::fine_tuning::{FineTuningJobStatus, FineTuningService};
}
