use crate::errors::categories::{
    AuthenticationError, ConfigurationError, DataError, NetworkError, RateLimitError, ServerError,
    ValidationError,
};
use std::time::Duration;
use thiserror::Error;

pub type FinetuneResult<T> = Result<T, FinetuneError>;

#[derive(Error, Debug, Clone)]
pub enum FinetuneError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Rate limit error: {0}")]
    RateLimit(#[from] RateLimitError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Request error: {status_code} - {message}")]
    Request {
        status_code: u16,
        message: String,
        error_type: Option<String>,
        error_code: Option<String>,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Timeout error: operation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl FinetuneError {
    pub fn unknown(message: impl Into<String>) -> Self {
        FinetuneError::Unknown(message.into())
    }

    /// Transient failures: rate limits, network faults, 5xx and timeouts.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FinetuneError::RateLimit(_)
                | FinetuneError::Network(_)
                | FinetuneError::Server(_)
                | FinetuneError::Timeout { .. }
        )
    }

    pub fn is_authentication_error(&self) -> bool {
        matches!(self, FinetuneError::Authentication(_))
    }

    pub fn is_data_error(&self) -> bool {
        matches!(self, FinetuneError::Data(_))
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            FinetuneError::RateLimit(err) => err.retry_after().map(Duration::from_secs),
            _ => None,
        }
    }

    pub fn error_code(&self) -> Option<&str> {
        match self {
            FinetuneError::Request { error_code, .. } => error_code.as_deref(),
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            FinetuneError::Request { status_code, .. } => Some(*status_code),
            FinetuneError::Authentication(_) => Some(401),
            FinetuneError::Validation(ValidationError::NotFound(_)) => Some(404),
            FinetuneError::RateLimit(_) => Some(429),
            FinetuneError::Server(ServerError::InternalError(_)) => Some(500),
            FinetuneError::Server(ServerError::BadGateway(_)) => Some(502),
            FinetuneError::Server(ServerError::ServiceUnavailable(_)) => Some(503),
            FinetuneError::Server(ServerError::GatewayTimeout(_)) => Some(504),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FinetuneError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FinetuneError::Timeout { timeout_ms: 0 }
        } else if err.is_connect() {
            FinetuneError::Network(NetworkError::ConnectionFailed(err.to_string()))
        } else if err.is_decode() {
            FinetuneError::Deserialization(err.to_string())
        } else {
            FinetuneError::Network(NetworkError::RequestFailed(err.to_string()))
        }
    }
}

impl From<serde_json::Error> for FinetuneError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            FinetuneError::Deserialization(err.to_string())
        } else {
            FinetuneError::Serialization(err.to_string())
        }
    }
}

impl From<url::ParseError> for FinetuneError {
    fn from(err: url::ParseError) -> Self {
        FinetuneError::Configuration(ConfigurationError::InvalidBaseUrl(err.to_string()))
    }
}

impl From<std::io::Error> for FinetuneError {
    fn from(err: std::io::Error) -> Self {
        FinetuneError::Data(DataError::Io(err.to_string()))
    }
}

impl From<csv::Error> for FinetuneError {
    fn from(err: csv::Error) -> Self {
        FinetuneError::Data(DataError::Csv(err.to_string()))
    }
}
