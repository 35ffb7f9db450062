use crate::errors::{ErrorMapper, FinetuneError, FinetuneResult};
use bytes::Bytes;
use reqwest::Response;
use serde::de::DeserializeOwned;

pub struct ResponseParser;

impl ResponseParser {
    /// Successful bodies parse as JSON; an empty body becomes `null`.
    pub async fn parse_response(response: Response) -> FinetuneResult<serde_json::Value> {
        let body = Self::parse_bytes(response).await?;
        if body.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Self::parse_json(&body)
    }

    pub async fn parse_bytes(response: Response) -> FinetuneResult<Bytes> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        if status.is_success() {
            Ok(body)
        } else {
            let error = ErrorMapper::from_response(status.as_u16(), &headers, &body);
            tracing::debug!(status = status.as_u16(), error = %error, "request rejected");
            Err(error)
        }
    }

    pub fn parse_json<T: DeserializeOwned>(data: &[u8]) -> FinetuneResult<T> {
        serde_json::from_slice(data).map_err(|e| {
            FinetuneError::Deserialization(format!(
                "Failed to deserialize JSON: {}. Data: {}",
                e,
                String::from_utf8_lossy(data)
            ))
        })
    }

    /// Converts a transport JSON value into a typed response.
    pub fn from_value<T: DeserializeOwned>(value: serde_json::Value) -> FinetuneResult<T> {
        serde_json::from_value(value)
            .map_err(|e| FinetuneError::Deserialization(format!("Unexpected response shape: {}", e)))
    }
}
