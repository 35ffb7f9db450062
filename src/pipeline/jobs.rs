//! Upload, submit and wait for a fine-tuning job.

use crate::errors::{FinetuneError, FinetuneResult, ValidationError};
use crate::services::files::{FilePurpose, FileService, FileUploadRequest};
use crate::services::fine_tuning::{
    FineTuningJob, FineTuningJobRequest, FineTuningJobStatus, FineTuningService, Hyperparameters,
};
use bytes::Bytes;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Everything needed to start a job from local JSONL files.
#[derive(Debug, Clone)]
pub struct JobSubmission {
    pub model: String,
    pub training_file: PathBuf,
    pub validation_file: Option<PathBuf>,
    pub hyperparameters: Option<Hyperparameters>,
    pub suffix: Option<String>,
    pub seed: Option<i64>,
}

impl JobSubmission {
    pub fn new(model: impl Into<String>, training_file: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            training_file: training_file.into(),
            validation_file: None,
            hyperparameters: None,
            suffix: None,
            seed: None,
        }
    }

    pub fn with_validation_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.validation_file = Some(path.into());
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

/// Uploads the training (and validation) files, then creates the job.
pub async fn submit_job(
    files: &dyn FileService,
    fine_tuning: &dyn FineTuningService,
    submission: JobSubmission,
) -> FinetuneResult<FineTuningJob> {
    let training = files
        .upload(FileUploadRequest::from_path(
            &submission.training_file,
            FilePurpose::FineTune,
        )?)
        .await?;
    tracing::info!(file_id = %training.id, "training file uploaded");

    let mut request = FineTuningJobRequest::new(submission.model, training.id);

    if let Some(path) = &submission.validation_file {
        let validation = files
            .upload(FileUploadRequest::from_path(path, FilePurpose::FineTune)?)
            .await?;
        tracing::info!(file_id = %validation.id, "validation file uploaded");
        request = request.with_validation_file(validation.id);
    }
    if let Some(hyperparameters) = submission.hyperparameters.filter(|hp| !hp.is_empty()) {
        request = request.with_hyperparameters(hyperparameters);
    }
    if let Some(suffix) = submission.suffix {
        request = request.with_suffix(suffix);
    }
    if let Some(seed) = submission.seed {
        request = request.with_seed(seed);
    }

    fine_tuning.create(request).await
}

/// Polls a job's status field until it reaches a terminal state.
#[derive(Debug, Clone)]
pub struct JobPoller {
    interval: Duration,
    timeout: Option<Duration>,
}

impl Default for JobPoller {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            timeout: None,
        }
    }
}

impl JobPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the first terminal snapshot of the job, or a timeout error.
    /// A zero interval is rejected before any request is made.
    pub async fn wait(
        &self,
        fine_tuning: &dyn FineTuningService,
        job_id: &str,
    ) -> FinetuneResult<FineTuningJob> {
        if self.interval.is_zero() {
            return Err(FinetuneError::Validation(ValidationError::InvalidParameter {
                parameter: "interval".to_string(),
                reason: "must be greater than zero".to_string(),
            }));
        }

        let started = Instant::now();
        let mut last_status: Option<FineTuningJobStatus> = None;

        loop {
            let job = fine_tuning.retrieve(job_id).await?;

            if last_status != Some(job.status) {
                tracing::info!(
                    job_id,
                    status = %job.status,
                    elapsed_secs = started.elapsed().as_secs(),
                    "job status"
                );
                last_status = Some(job.status);
            }

            if job.is_terminal() {
                if let Some(error) = &job.error {
                    tracing::warn!(job_id, error = %error.message, "job did not succeed");
                }
                return Ok(job);
            }

            if let Some(timeout) = self.timeout {
                if started.elapsed() + self.interval > timeout {
                    return Err(FinetuneError::Timeout {
                        timeout_ms: timeout.as_millis() as u64,
                    });
                }
            }

            tokio::time::sleep(self.interval).await;
        }
    }
}

/// Downloads the first result file of a finished job (the step metrics CSV).
pub async fn fetch_result_metrics(
    files: &dyn FileService,
    job: &FineTuningJob,
) -> FinetuneResult<Bytes> {
    let file_id = job.result_files.first().ok_or_else(|| {
        FinetuneError::Validation(ValidationError::NotFound(format!(
            "job {} has no result files (status {})",
            job.id, job.status
        )))
    })?;
    files.content(file_id).await
}
