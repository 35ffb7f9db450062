use crate::errors::FinetuneResult;
use crate::types::{DeletionStatus, ListResponse};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileObject {
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub bytes: u64,
    pub created_at: i64,
    pub filename: String,
    pub purpose: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_details: Option<String>,
}

impl FileObject {
    /// `processed` on OpenAI, `processed`/`succeeded` on Azure. Files without
    /// a status are treated as ready.
    pub fn is_ready(&self) -> bool {
        matches!(
            self.status.as_deref(),
            None | Some("processed") | Some("succeeded") | Some("uploaded")
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilePurpose {
    #[serde(rename = "fine-tune")]
    FineTune,
    #[serde(rename = "fine-tune-results")]
    FineTuneResults,
    #[serde(rename = "vision")]
    Vision,
}

impl FilePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilePurpose::FineTune => "fine-tune",
            FilePurpose::FineTuneResults => "fine-tune-results",
            FilePurpose::Vision => "vision",
        }
    }
}

impl fmt::Display for FilePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct FileUploadRequest {
    pub file_data: Bytes,
    pub filename: String,
    pub purpose: FilePurpose,
}

impl FileUploadRequest {
    pub fn new(file_data: Bytes, filename: impl Into<String>, purpose: FilePurpose) -> Self {
        Self {
            file_data,
            filename: filename.into(),
            purpose,
        }
    }

    /// Reads `path` into memory; the upload name is the file name component.
    pub fn from_path(path: impl AsRef<Path>, purpose: FilePurpose) -> FinetuneResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(Bytes::from(data), filename, purpose))
    }
}

pub type FileListResponse = ListResponse<FileObject>;

pub type FileDeleteResponse = DeletionStatus;
