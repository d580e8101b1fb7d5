use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::constraints::ConstraintDBResponse;
use crate::types::{ConstraintId, ConstraintType, ParameterId, ValueId};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintCreate {
    #[serde(rename = "type")]
    pub constraint_type: ConstraintType,
    pub from_id: ParameterId,
    pub from_value_id: ValueId,
    pub target_id: ParameterId,
    pub target_value_id: ValueId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintResponse {
    pub id: ConstraintId,
    #[serde(rename = "type")]
    pub constraint_type: ConstraintType,
    pub from_id: ParameterId,
    pub from_value_id: ValueId,
    pub target_id: ParameterId,
    pub target_value_id: ValueId,
}

impl From<ConstraintDBResponse> for ConstraintResponse {
    fn from(db: ConstraintDBResponse) -> Self {
        Self {
            id: db.id,
            constraint_type: db.constraint_type,
            from_id: db.from_parameter_id,
            from_value_id: db.from_value_id,
            target_id: db.target_parameter_id,
            target_value_id: db.target_value_id,
        }
    }
}
