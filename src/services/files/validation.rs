use crate::errors::{FinetuneError, FinetuneResult, ValidationError};
use crate::services::files::{FilePurpose, FileUploadRequest};

pub struct FileRequestValidator;

impl FileRequestValidator {
    const MAX_FILE_SIZE: u64 = 512 * 1024 * 1024;

    pub fn validate(request: &FileUploadRequest) -> FinetuneResult<()> {
        if request.filename.is_empty() {
            return Err(FinetuneError::Validation(
                ValidationError::MissingRequiredField("filename".to_string()),
            ));
        }

        if request.file_data.is_empty() {
            return Err(FinetuneError::Validation(ValidationError::InvalidParameter {
                parameter: "file".to_string(),
                reason: "file cannot be empty".to_string(),
            }));
        }

        let file_size = request.file_data.len() as u64;
        if file_size > Self::MAX_FILE_SIZE {
            return Err(FinetuneError::Validation(ValidationError::FileTooLarge {
                max_size: Self::MAX_FILE_SIZE,
                actual_size: file_size,
            }));
        }

        if request.purpose == FilePurpose::FineTune && !request.filename.ends_with(".jsonl") {
            return Err(FinetuneError::Validation(ValidationError::InvalidFileFormat {
                expected: ".jsonl".to_string(),
                actual: request.filename.clone(),
            }));
        }

        Ok(())
    }
}
