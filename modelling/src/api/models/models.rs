use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::constraints::ConstraintResponse;
use crate::db::models::models::ModelDBResponse;
use crate::types::ModelId;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ModelCreate {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelCreated {
    pub model_id: ModelId,
}

/// A model with its name in the request locale (`""` if untranslated)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelResponse {
    pub id: ModelId,
    pub name: String,
    pub translation: String,
}

impl From<ModelDBResponse> for ModelResponse {
    fn from(db: ModelDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            translation: db.translation,
        }
    }
}

/// A model together with its constraints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelDetail {
    #[serde(flatten)]
    pub model: ModelResponse,
    pub constraints: Vec<ConstraintResponse>,
}
