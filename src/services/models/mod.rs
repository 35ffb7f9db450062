mod service;
mod types;


#[cfg(test)]
pub use service::MockModelService;
pub use service::{ModelService, ModelServiceImpl};
pub use types::{Model, ModelListResponse};
