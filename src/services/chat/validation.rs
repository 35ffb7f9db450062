use crate::errors::{FinetuneError, FinetuneResult, ValidationError};
use crate::services::chat::ChatCompletionRequest;

pub struct ChatRequestValidator;

impl ChatRequestValidator {
    pub fn validate(request: &ChatCompletionRequest) -> FinetuneResult<()> {
        if request.messages.is_empty() {
            return Err(FinetuneError::Validation(
                ValidationError::MissingRequiredField("messages".to_string()),
            ));
        }

        if request.model.trim().is_empty() {
            return Err(FinetuneError::Validation(
                ValidationError::MissingRequiredField("model".to_string()),
            ));
        }

        if let Some(temperature) = request.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(FinetuneError::Validation(ValidationError::ValueOutOfRange {
                    field: "temperature".to_string(),
                    min: "0.0".to_string(),
                    max: "2.0".to_string(),
                    value: temperature.to_string(),
                }));
            }
        }

        if let Some(top_p) = request.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err(FinetuneError::Validation(ValidationError::ValueOutOfRange {
                    field: "top_p".to_string(),
                    min: "0.0".to_string(),
                    max: "1.0".to_string(),
                    value: top_p.to_string(),
                }));
            }
        }

        if request.max_tokens == Some(0) {
            return Err(FinetuneError::Validation(ValidationError::InvalidParameter {
                parameter: "max_tokens".to_string(),
                reason: "must be greater than 0".to_string(),
            }));
        }

        Ok(())
    }
}
