use serde::{Deserialize, Serialize};

/// Body of the management-plane `PUT .../deployments/{name}` call.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentRequest {
    pub sku: Sku,
    pub properties: DeploymentProperties,
}

impl DeploymentRequest {
    /// Standard SKU with capacity 1, serving `model` as an OpenAI-format model.
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            sku: Sku::default(),
            properties: DeploymentProperties {
                model: DeploymentModel {
                    format: "OpenAI".to_string(),
                    name: model.into(),
                    version: "1".to_string(),
                },
            },
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.sku.capacity = capacity;
        self
    }

    pub fn with_sku(mut self, name: impl Into<String>) -> Self {
        self.sku.name = name.into();
        self
    }

    pub fn with_model_version(mut self, version: impl Into<String>) -> Self {
        self.properties.model.version = version.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sku {
    pub name: String,
    pub capacity: u32,
}

impl Default for Sku {
    fn default() -> Self {
        Self {
            name: "standard".to_string(),
            capacity: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeploymentProperties {
    pub model: DeploymentModel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentModel {
    pub format: String,
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvisioningState {
    Accepted,
    Creating,
    Updating,
    Moving,
    Deleting,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl ProvisioningState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProvisioningState::Succeeded | ProvisioningState::Failed | ProvisioningState::Canceled
        )
    }
}

/// Deployment resource as returned by the management plane.
#[derive(Debug, Clone, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub sku: Option<Sku>,
    pub properties: DeploymentStatus,
}

impl Deployment {
    pub fn provisioning_state(&self) -> Option<ProvisioningState> {
        self.properties.provisioning_state
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentStatus {
    #[serde(default)]
    pub model: Option<DeploymentModel>,
    #[serde(rename = "provisioningState", default)]
    pub provisioning_state: Option<ProvisioningState>,
}
