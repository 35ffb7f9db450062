use crate::errors::{FinetuneError, FinetuneResult, ValidationError};
use crate::services::fine_tuning::{FineTuningJobRequest, HyperparameterValue};

pub struct FineTuningRequestValidator;

impl FineTuningRequestValidator {
    const MAX_SUFFIX_LEN: usize = 64;

    pub fn validate(request: &FineTuningJobRequest) -> FinetuneResult<()> {
        if request.training_file.trim().is_empty() {
            return Err(FinetuneError::Validation(
                ValidationError::MissingRequiredField("training_file".to_string()),
            ));
        }

        if request.model.trim().is_empty() {
            return Err(FinetuneError::Validation(
                ValidationError::MissingRequiredField("model".to_string()),
            ));
        }

        if let Some(suffix) = &request.suffix {
            if suffix.len() > Self::MAX_SUFFIX_LEN {
                return Err(FinetuneError::Validation(ValidationError::InvalidParameter {
                    parameter: "suffix".to_string(),
                    reason: format!("at most {} characters", Self::MAX_SUFFIX_LEN),
                }));
            }
        }

        if let Some(hp) = &request.hyperparameters {
            for (name, value) in [
                ("n_epochs", &hp.n_epochs),
                ("batch_size", &hp.batch_size),
                ("learning_rate_multiplier", &hp.learning_rate_multiplier),
            ] {
                match value {
                    Some(HyperparameterValue::Number(n)) if *n <= 0.0 => {
                        return Err(FinetuneError::Validation(ValidationError::InvalidParameter {
                            parameter: name.to_string(),
                            reason: "must be positive".to_string(),
                        }));
                    }
                    Some(HyperparameterValue::Auto(s)) if s != "auto" => {
                        return Err(FinetuneError::Validation(ValidationError::InvalidParameter {
                            parameter: name.to_string(),
                            reason: format!("expected a number or \"auto\", got \"{}\"", s),
                        }));
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }
}
