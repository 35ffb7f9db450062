use crate::types::ListResponse;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub owned_by: String,
}

impl Model {
    /// Fine-tuned model ids carry an `ft:` prefix or an `.ft-` infix.
    pub fn is_fine_tuned(&self) -> bool {
        self.id.starts_with("ft:") || self.id.contains(".ft-")
    }
}

pub type ModelListResponse = ListResponse<Model>;
