use crate::auth::AuthManager;
use crate::errors::FinetuneResult;
use crate::resilience::ResilienceOrchestrator;
use crate::services::files::{
    FileDeleteResponse, FileListResponse, FileObject, FilePurpose, FileRequestValidator,
    FileUploadRequest,
};
use crate::transport::{with_query, HttpTransport, ResponseParser};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileService: Send + Sync {
    async fn list(&self, purpose: Option<FilePurpose>) -> FinetuneResult<FileListResponse>;
    async fn upload(&self, request: FileUploadRequest) -> FinetuneResult<FileObject>;
    async fn retrieve(&self, file_id: &str) -> FinetuneResult<FileObject>;
    async fn delete(&self, file_id: &str) -> FinetuneResult<FileDeleteResponse>;
    async fn content(&self, file_id: &str) -> FinetuneResult<Bytes>;
}

pub struct FileServiceImpl {
    transport: Arc<dyn HttpTransport>,
    auth_manager: Arc<dyn AuthManager>,
    resilience: Arc<ResilienceOrchestrator>,
}

impl FileServiceImpl {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
        resilience: Arc<ResilienceOrchestrator>,
    ) -> Self {
        Self {
            transport,
            auth_manager,
            resilience,
        }
    }

    async fn get(&self, operation: &str, path: &str) -> FinetuneResult<serde_json::Value> {
        let mut headers = HeaderMap::new();
        self.auth_manager.apply_auth(&mut headers).await?;

        let transport = &self.transport;
        let headers = &headers;
        self.resilience
            .execute(operation, move || async move {
                transport.send_json(Method::GET, path, None, headers).await
            })
            .await
    }
}

#[async_trait]
impl FileService for FileServiceImpl {
    async fn list(&self, purpose: Option<FilePurpose>) -> FinetuneResult<FileListResponse> {
        let path = with_query("/files", &[("purpose", purpose.map(|p| p.to_string()))]);
        let value = self.get("files.list", &path).await?;
        ResponseParser::from_value(value)
    }

    async fn upload(&self, request: FileUploadRequest) -> FinetuneResult<FileObject> {
        FileRequestValidator::validate(&request)?;

        let mut headers = HeaderMap::new();
        self.auth_manager.apply_auth(&mut headers).await?;

        tracing::info!(
            filename = %request.filename,
            purpose = %request.purpose,
            bytes = request.file_data.len(),
            "uploading file"
        );

        let transport = &self.transport;
        let headers = &headers;
        let request = &request;
        let value = self
            .resilience
            .execute("files.upload", move || async move {
                transport
                    .upload_file(
                        "/files",
                        request.file_data.clone(),
                        &request.filename,
                        request.purpose.as_str(),
                        headers,
                    )
                    .await
            })
            .await?;

        let file: FileObject = ResponseParser::from_value(value)?;
        tracing::info!(file_id = %file.id, status = ?file.status, "file uploaded");
        Ok(file)
    }

    async fn retrieve(&self, file_id: &str) -> FinetuneResult<FileObject> {
        let value = self.get("files.retrieve", &format!("/files/{}", file_id)).await?;
        ResponseParser::from_value(value)
    }

    async fn delete(&self, file_id: &str) -> FinetuneResult<FileDeleteResponse> {
        let mut headers = HeaderMap::new();
        self.auth_manager.apply_auth(&mut headers).await?;

        let path = format!("/files/{}", file_id);
        let transport = &self.transport;
        let (path, headers) = (path.as_str(), &headers);
        let value = self
            .resilience
            .execute("files.delete", move || async move {
                transport.send_json(Method::DELETE, path, None, headers).await
            })
            .await?;

        ResponseParser::from_value(value)
    }

    async fn content(&self, file_id: &str) -> FinetuneResult<Bytes> {
        let mut headers = HeaderMap::new();
        self.auth_manager.apply_auth(&mut headers).await?;

        let path = format!("/files/{}/content", file_id);
        let transport = &self.transport;
        let (path, headers) = (path.as_str(), &headers);
        self.resilience
            .execute("files.content", move || async move {
                transport.download_file(path, headers).await
            })
            .await
    }
}
