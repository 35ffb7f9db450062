mod http_transport;
mod multipart;
mod response_parser;

pub use http_transport::ReqwestTransport;
pub use multipart::MultipartBuilder;
pub use response_parser::ResponseParser;

use crate::errors::FinetuneResult;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};

/// Wire-level access to one API root. Bodies travel as JSON values so the
/// trait stays object safe; services own their typed (de)serialization.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        headers: &HeaderMap,
    ) -> FinetuneResult<serde_json::Value>;

    async fn upload_file(
        &self,
        path: &str,
        file_data: Bytes,
        file_name: &str,
        purpose: &str,
        headers: &HeaderMap,
    ) -> FinetuneResult<serde_json::Value>;

    async fn download_file(&self, path: &str, headers: &HeaderMap) -> FinetuneResult<Bytes>;
}

/// Appends `key=value` pairs for the present entries of `params`.
pub fn with_query(path: &str, params: &[(&str, Option<String>)]) -> String {
    let pairs: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| format!("{}={}", key, v)))
        .collect();
    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, pairs.join("&"))
    }
}
