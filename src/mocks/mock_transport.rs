//! Mock HTTP transport for testing

use crate::errors::{FinetuneError, FinetuneResult};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted transport: responses are consumed in order, requests are recorded.
#[derive(Clone)]
pub struct MockHttpTransport {
    inner: Arc<Mutex<MockHttpTransportInner>>,
}

struct MockHttpTransportInner {
    responses: VecDeque<FinetuneResult<serde_json::Value>>,
    file_upload_responses: VecDeque<FinetuneResult<serde_json::Value>>,
    file_download_responses: VecDeque<FinetuneResult<Bytes>>,
    requests: Vec<MockRequest>,
}

#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
    pub file_name: Option<String>,
    pub purpose: Option<String>,
}

impl MockHttpTransport {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockHttpTransportInner {
                responses: VecDeque::new(),
                file_upload_responses: VecDeque::new(),
                file_download_responses: VecDeque::new(),
                requests: Vec::new(),
            })),
        }
    }

    pub fn with_json_response(self, response: serde_json::Value) -> Self {
        self.inner.lock().unwrap().responses.push_back(Ok(response));
        self
    }

    pub fn with_error_response(self, error: FinetuneError) -> Self {
        self.inner.lock().unwrap().responses.push_back(Err(error));
        self
    }

    pub fn with_file_upload_response(self, response: FinetuneResult<serde_json::Value>) -> Self {
        self.inner
            .lock()
            .unwrap()
            .file_upload_responses
            .push_back(response);
        self
    }

    pub fn with_file_download_response(self, response: FinetuneResult<Bytes>) -> Self {
        self.inner
            .lock()
            .unwrap()
            .file_download_responses
            .push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<MockRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> Option<MockRequest> {
        self.inner.lock().unwrap().requests.last().cloned()
    }

    /// Verify that a request was made with the given method and path
    pub fn verify_request(&self, method: Method, path: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .requests
            .iter()
            .any(|r| r.method == method && r.path == path)
    }

    pub fn request_count(&self) -> usize {
        self.inner.lock().unwrap().requests.len()
    }

    fn record(&self, request: MockRequest) {
        self.inner.lock().unwrap().requests.push(request);
    }
}

impl Default for MockHttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        headers: &HeaderMap,
    ) -> FinetuneResult<serde_json::Value> {
        self.record(MockRequest {
            method,
            path: path.to_string(),
            body: body.cloned(),
            headers: headers.clone(),
            file_name: None,
            purpose: None,
        });

        self.inner
            .lock()
            .unwrap()
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(FinetuneError::unknown("No mock response configured")))
    }

    async fn upload_file(
        &self,
        path: &str,
        _file_data: Bytes,
        file_name: &str,
        purpose: &str,
        headers: &HeaderMap,
    ) -> FinetuneResult<serde_json::Value> {
        self.record(MockRequest {
            method: Method::POST,
            path: path.to_string(),
            body: None,
            headers: headers.clone(),
            file_name: Some(file_name.to_string()),
            purpose: Some(purpose.to_string()),
        });

        self.inner
            .lock()
            .unwrap()
            .file_upload_responses
            .pop_front()
            .unwrap_or_else(|| Err(FinetuneError::unknown("No mock upload response configured")))
    }

    async fn download_file(&self, path: &str, headers: &HeaderMap) -> FinetuneResult<Bytes> {
        self.record(MockRequest {
            method: Method::GET,
            path: path.to_string(),
            body: None,
            headers: headers.clone(),
            file_name: None,
            purpose: None,
        });

        self.inner
            .lock()
            .unwrap()
            .file_download_responses
            .pop_front()
            .unwrap_or_else(|| Err(FinetuneError::unknown("No mock download response configured")))
    }
}
