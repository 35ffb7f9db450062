//! Result-file metrics fixtures

/// Per-step metrics as written into a job's result file. Validation columns
/// are only filled on evaluation steps.
pub const STEP_METRICS_CSV: &str = "\
step,train_loss,train_accuracy,valid_loss,valid_mean_token_accuracy
1,2.0,0.40,,
2,1.6,0.50,1.9,0.45
3,1.2,0.60,,
4,1.0,0.65,1.1,0.62
5,0.8,0.70,,
";
