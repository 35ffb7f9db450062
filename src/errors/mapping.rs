use crate::errors::{
    AuthenticationError, FinetuneError, RateLimitError, ServerError, ValidationError,
};
use serde::{Deserialize, Serialize};

/// Error envelope returned by both the OpenAI and Azure OpenAI data planes.
#[derive(Debug, Deserialize, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
}

pub struct ErrorMapper;

impl ErrorMapper {
    /// Maps HTTP status code and error response to FinetuneError
    pub fn map_status_code(
        status_code: u16,
        error_response: Option<ApiErrorResponse>,
    ) -> FinetuneError {
        let error_detail = error_response.map(|r| r.error);
        let message = error_detail
            .as_ref()
            .map(|d| d.message.clone())
            .unwrap_or_else(|| format!("HTTP error: {}", status_code));
        let error_type = error_detail.as_ref().and_then(|d| d.error_type.clone());
        let error_code = error_detail.as_ref().and_then(|d| d.code.clone());

        match status_code {
            400 => FinetuneError::Validation(ValidationError::InvalidRequest(message)),
            401 => {
                if message.contains("expired") {
                    FinetuneError::Authentication(AuthenticationError::ExpiredCredential(message))
                } else {
                    FinetuneError::Authentication(AuthenticationError::InvalidApiKey(message))
                }
            }
            403 => {
                if message.contains("permission") {
                    FinetuneError::Authentication(AuthenticationError::InsufficientPermissions(
                        message,
                    ))
                } else {
                    FinetuneError::Authentication(AuthenticationError::Unauthorized(message))
                }
            }
            404 => FinetuneError::Validation(ValidationError::NotFound(message)),
            429 => {
                if error_code.as_deref() == Some("insufficient_quota") {
                    FinetuneError::RateLimit(RateLimitError::QuotaExceeded(message))
                } else {
                    FinetuneError::RateLimit(RateLimitError::RateLimitExceeded { message })
                }
            }
            500 => FinetuneError::Server(ServerError::InternalError(message)),
            502 => FinetuneError::Server(ServerError::BadGateway(message)),
            503 => FinetuneError::Server(ServerError::ServiceUnavailable(message)),
            504 => FinetuneError::Server(ServerError::GatewayTimeout(message)),
            _ => FinetuneError::Request {
                status_code,
                message,
                error_type,
                error_code,
            },
        }
    }

    /// Maps a failed response, attaching `retry-after` to rate limit errors.
    pub fn map_status_with_headers(
        status_code: u16,
        headers: &http::HeaderMap,
        body: &str,
    ) -> FinetuneError {
        let error_response = Self::parse_error_response(body);
        let error = Self::map_status_code(status_code, error_response);

        match (error, Self::extract_retry_after(headers)) {
            (FinetuneError::RateLimit(RateLimitError::RateLimitExceeded { message }), Some(secs)) => {
                FinetuneError::RateLimit(RateLimitError::TooManyRequests {
                    message,
                    retry_after_secs: Some(secs),
                })
            }
            (error, _) => error,
        }
    }

    /// Extracts retry-after header value in seconds
    pub fn extract_retry_after(headers: &http::HeaderMap) -> Option<u64> {
        headers
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok())
    }

    pub fn parse_error_response(body: &str) -> Option<ApiErrorResponse> {
        serde_json::from_str(body).ok()
    }

    pub fn from_response(status: u16, headers: &http::HeaderMap, body: &[u8]) -> FinetuneError {
        let body_str = String::from_utf8_lossy(body);
        Self::map_status_with_headers(status, headers, &body_str)
    }
}
