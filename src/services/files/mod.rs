mod service;
mod types;
mod validation;


#[cfg(test)]
pub use service::MockFileService;
pub use service::{FileService, FileServiceImpl};
pub use types::{FileDeleteResponse, FileListResponse, FileObject, FilePurpose, FileUploadRequest};
pub use validation::FileRequestValidator;
