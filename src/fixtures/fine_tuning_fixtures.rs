//! Fine-tuning fixtures

use serde_json::json;

/// Job snapshot in the given status, e.g. `"running"`.
pub fn fine_tuning_job_with_status(status: &str) -> serde_json::Value {
    let succeeded = status == "succeeded";
    json!({
        "id": "ftjob-abc123",
        "object": "fine_tuning.job",
        "model": "gpt-4o-2024-08-06",
        "created_at": 1721764800,
        "finished_at": if succeeded { json!(1721768400) } else { json!(null) },
        "fine_tuned_model": if succeeded { json!("gpt-4o-2024-08-06.ft-abc123") } else { json!(null) },
        "organization_id": "org-123",
        "result_files": if succeeded { json!(["file-res456"]) } else { json!([]) },
        "status": status,
        "validation_file": "file-val789",
        "training_file": "file-abc123",
        "hyperparameters": {
            "n_epochs": 3,
            "batch_size": "auto",
            "learning_rate_multiplier": 1.0
        },
        "trained_tokens": if succeeded { json!(42000) } else { json!(null) },
        "seed": 105
    })
}

pub fn fine_tuning_job_response() -> serde_json::Value {
    fine_tuning_job_with_status("validating_files")
}

pub fn failed_fine_tuning_job() -> serde_json::Value {
    let mut job = fine_tuning_job_with_status("failed");
    job["error"] = json!({
        "code": "invalid_training_file",
        "message": "The training file has 3 examples; at least 10 are required.",
        "param": "training_file"
    });
    job
}

pub fn list_fine_tuning_jobs_response() -> serde_json::Value {
    json!({
        "object": "list",
        "data": [fine_tuning_job_with_status("running")],
        "has_more": false
    })
}

pub fn fine_tuning_events_response() -> serde_json::Value {
    json!({
        "object": "list",
        "data": [
            {
                "id": "ftevent-2",
                "object": "fine_tuning.job.event",
                "created_at": 1721765000,
                "level": "info",
                "message": "Step 10/300: training loss=1.52",
                "type": "metrics",
                "data": {"step": 10, "train_loss": 1.52, "train_mean_token_accuracy": 0.61}
            },
            {
                "id": "ftevent-1",
                "object": "fine_tuning.job.event",
                "created_at": 1721764900,
                "level": "info",
                "message": "Fine-tuning job started",
                "type": "message"
            }
        ],
        "has_more": true
    })
}

pub fn fine_tuning_checkpoints_response() -> serde_json::Value {
    json!({
        "object": "list",
        "data": [{
            "id": "ftckpt-zc8",
            "object": "fine_tuning.job.checkpoint",
            "created_at": 1721768000,
            "fine_tuned_model_checkpoint": "gpt-4o-2024-08-06.ft-abc123:ckpt-step-300",
            "fine_tuning_job_id": "ftjob-abc123",
            "step_number": 300,
            "metrics": {
                "step": 300,
                "train_loss": 0.41,
                "train_mean_token_accuracy": 0.88,
                "valid_loss": 0.52,
                "valid_mean_token_accuracy": 0.85
            }
        }],
        "has_more": false
    })
}
