mod service;
mod types;


#[cfg(test)]
pub use service::MockDeploymentService;
pub use service::{DeploymentService, DeploymentServiceImpl};
pub use types::{
    Deployment, DeploymentModel, DeploymentProperties, DeploymentRequest, DeploymentStatus,
    ProvisioningState, Sku,
};
