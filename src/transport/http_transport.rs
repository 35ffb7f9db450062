use crate::client::{FinetuneConfig, ManagementConfig};
use crate::errors::{FinetuneError, FinetuneResult, NetworkError};
use crate::transport::{HttpTransport, MultipartBuilder, ResponseParser};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// HTTP transport implementation using reqwest
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
    api_version: Option<String>,
    default_headers: HeaderMap,
}

impl ReqwestTransport {
    /// Data plane transport. Appends `api-version` when the config carries one.
    pub fn new(config: &FinetuneConfig) -> FinetuneResult<Self> {
        let mut client_builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str());

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url.as_str())
                .map_err(|e| FinetuneError::Network(NetworkError::ProxyError(e.to_string())))?;
            client_builder = client_builder.proxy(proxy);
        }

        let client = client_builder.build().map_err(|e| {
            FinetuneError::Network(NetworkError::ConnectionFailed(format!(
                "Failed to build HTTP client: {}",
                e
            )))
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_version: config.api_version.clone(),
            default_headers: HeaderMap::new(),
        })
    }

    /// Management plane transport rooted at the resource manager endpoint.
    pub fn management(config: &ManagementConfig) -> FinetuneResult<Self> {
        let mut transport = Self::with_base_url(config.endpoint.as_str(), config.timeout)?;
        transport.api_version = Some(config.api_version.clone());
        Ok(transport)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> FinetuneResult<Self> {
        let url = Url::parse(base_url)?;

        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            FinetuneError::Network(NetworkError::ConnectionFailed(format!(
                "Failed to build HTTP client: {}",
                e
            )))
        })?;

        Ok(Self {
            client,
            base_url: url,
            api_version: None,
            default_headers: HeaderMap::new(),
        })
    }

    /// Sets default headers to include in all requests
    pub fn with_default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    /// Joins `path` (which may carry its own query) onto the base URL.
    fn build_url(&self, path: &str) -> FinetuneResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined)?;
        if let Some(version) = &self.api_version {
            url.query_pairs_mut().append_pair("api-version", version);
        }
        Ok(url)
    }

    fn merge_headers(&self, request_headers: &HeaderMap) -> HeaderMap {
        let mut headers = self.default_headers.clone();
        for (key, value) in request_headers.iter() {
            headers.insert(key.clone(), value.clone());
        }
        headers
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        headers: &HeaderMap,
    ) -> FinetuneResult<serde_json::Value> {
        let url = self.build_url(path)?;
        tracing::debug!(%method, url = %url, "sending request");

        let mut request = match method {
            Method::GET => self.client.get(url),
            Method::POST => self.client.post(url),
            Method::PUT => self.client.put(url),
            Method::DELETE => self.client.delete(url),
            Method::PATCH => self.client.patch(url),
            _ => {
                return Err(FinetuneError::Network(NetworkError::RequestFailed(
                    format!("Unsupported HTTP method: {}", method),
                )))
            }
        };

        request = request.headers(self.merge_headers(headers));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        ResponseParser::parse_response(response).await
    }

    async fn upload_file(
        &self,
        path: &str,
        file_data: Bytes,
        file_name: &str,
        purpose: &str,
        headers: &HeaderMap,
    ) -> FinetuneResult<serde_json::Value> {
        let url = self.build_url(path)?;
        tracing::debug!(url = %url, file_name, bytes = file_data.len(), "uploading file");

        let multipart = MultipartBuilder::new()
            .add_file("file", file_name, file_data)
            .add_text("purpose", purpose)
            .build();

        let response = self
            .client
            .post(url)
            .headers(self.merge_headers(headers))
            .multipart(multipart)
            .send()
            .await?;
        ResponseParser::parse_response(response).await
    }

    async fn download_file(&self, path: &str, headers: &HeaderMap) -> FinetuneResult<Bytes> {
        let url = self.build_url(path)?;
        tracing::debug!(url = %url, "downloading file");

        let response = self
            .client
            .get(url)
            .headers(self.merge_headers(headers))
            .send()
            .await?;
        ResponseParser::parse_bytes(response).await
    }
}
