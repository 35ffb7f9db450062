use crate::types::ListResponse;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FineTuningJobStatus {
    ValidatingFiles,
    #[serde(alias = "pending")]
    Queued,
    Running,
    Succeeded,
    Failed,
    #[serde(alias = "canceled")]
    Cancelled,
    /// Any status this crate does not know about; treated as still in flight.
    #[serde(other)]
    Unknown,
}

impl FineTuningJobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FineTuningJobStatus::Succeeded
                | FineTuningJobStatus::Failed
                | FineTuningJobStatus::Cancelled
        )
    }
}

impl fmt::Display for FineTuningJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FineTuningJobStatus::ValidatingFiles => "validating_files",
            FineTuningJobStatus::Queued => "queued",
            FineTuningJobStatus::Running => "running",
            FineTuningJobStatus::Succeeded => "succeeded",
            FineTuningJobStatus::Failed => "failed",
            FineTuningJobStatus::Cancelled => "cancelled",
            FineTuningJobStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FineTuningJobRequest {
    pub model: String,
    pub training_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyperparameters: Option<Hyperparameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

impl FineTuningJobRequest {
    pub fn new(model: impl Into<String>, training_file: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            training_file: training_file.into(),
            validation_file: None,
            hyperparameters: None,
            suffix: None,
            seed: None,
        }
    }

    pub fn with_validation_file(mut self, file_id: impl Into<String>) -> Self {
        self.validation_file = Some(file_id.into());
        self
    }

    pub fn with_hyperparameters(mut self, hyperparameters: Hyperparameters) -> Self {
        self.hyperparameters = Some(hyperparameters);
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_epochs: Option<HyperparameterValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<HyperparameterValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_rate_multiplier: Option<HyperparameterValue>,
}

impl Hyperparameters {
    pub fn is_empty(&self) -> bool {
        self.n_epochs.is_none() && self.batch_size.is_none() && self.learning_rate_multiplier.is_none()
    }
}

/// Either a number or the literal `"auto"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HyperparameterValue {
    Number(f64),
    Auto(String),
}

impl HyperparameterValue {
    pub fn auto() -> Self {
        HyperparameterValue::Auto("auto".to_string())
    }
}

/// Snapshot of a remote training job.
#[derive(Debug, Clone, Deserialize)]
pub struct FineTuningJob {
    pub id: String,
    #[serde(default)]
    pub object: String,
    pub created_at: i64,
    #[serde(default)]
    pub finished_at: Option<i64>,
    pub model: String,
    #[serde(default)]
    pub fine_tuned_model: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    pub status: FineTuningJobStatus,
    #[serde(default)]
    pub hyperparameters: Hyperparameters,
    pub training_file: String,
    #[serde(default)]
    pub validation_file: Option<String>,
    #[serde(default)]
    pub result_files: Vec<String>,
    #[serde(default)]
    pub trained_tokens: Option<u64>,
    #[serde(default)]
    pub seed: Option<i64>,
    #[serde(default)]
    pub error: Option<FineTuningError>,
}

impl FineTuningJob {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FineTuningError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
    #[serde(default)]
    pub param: Option<String>,
}

pub type FineTuningJobListResponse = ListResponse<FineTuningJob>;

#[derive(Debug, Clone, Deserialize)]
pub struct FineTuningEvent {
    pub id: String,
    #[serde(default)]
    pub object: String,
    pub created_at: i64,
    pub level: String,
    pub message: String,
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

pub type FineTuningEventListResponse = ListResponse<FineTuningEvent>;

/// Metrics recorded at a checkpoint step.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckpointMetrics {
    #[serde(default)]
    pub step: Option<f64>,
    #[serde(default)]
    pub train_loss: Option<f64>,
    #[serde(default)]
    pub train_mean_token_accuracy: Option<f64>,
    #[serde(default)]
    pub valid_loss: Option<f64>,
    #[serde(default)]
    pub valid_mean_token_accuracy: Option<f64>,
    #[serde(default)]
    pub full_valid_loss: Option<f64>,
    #[serde(default)]
    pub full_valid_mean_token_accuracy: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FineTuningCheckpoint {
    pub id: String,
    pub created_at: i64,
    pub fine_tuned_model_checkpoint: String,
    pub fine_tuning_job_id: String,
    pub step_number: u64,
    #[serde(default)]
    pub metrics: CheckpointMetrics,
}

pub type FineTuningCheckpointListResponse = ListResponse<FineTuningCheckpoint>;
