mod service;
mod types;
mod validation;


#[cfg(test)]
pub use service::MockFineTuningService;
pub use service::{FineTuningService, FineTuningServiceImpl};
pub use types::{
    CheckpointMetrics, FineTuningCheckpoint, FineTuningCheckpointListResponse, FineTuningError,
    FineTuningEvent, FineTuningEventListResponse, FineTuningJob, FineTuningJobListResponse,
    FineTuningJobRequest, FineTuningJobStatus, HyperparameterValue, Hyperparameters,
};
pub use validation::FineTuningRequestValidator;
