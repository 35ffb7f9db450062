//! Error fixtures

use crate::errors::{FinetuneError, NetworkError, RateLimitError, ServerError};
use serde_json::json;

/// Sample 401 authentication error response
pub fn error_401_invalid_api_key() -> serde_json::Value {
    json!({
        "error": {
            "message": "Incorrect API key provided.",
            "type": "invalid_request_error",
            "param": null,
            "code": "invalid_api_key"
        }
    })
}

/// Sample 429 rate limit error response
pub fn error_429_rate_limit() -> serde_json::Value {
    json!({
        "error": {
            "message": "Rate limit reached for requests",
            "type": "rate_limit_error",
            "param": null,
            "code": "rate_limit_exceeded"
        }
    })
}

pub fn service_unavailable() -> FinetuneError {
    FinetuneError::Server(ServerError::ServiceUnavailable(
        "The engine is currently overloaded, please try again later.".to_string(),
    ))
}

pub fn connection_reset() -> FinetuneError {
    FinetuneError::Network(NetworkError::ConnectionFailed(
        "connection reset by peer".to_string(),
    ))
}

pub fn rate_limited() -> FinetuneError {
    FinetuneError::RateLimit(RateLimitError::TooManyRequests {
        message: "Rate limit reached for requests".to_string(),
        retry_after_secs: None,
    })
}
