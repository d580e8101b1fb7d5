//! Database models for inter-parameter constraints.

use crate::types::{ConstraintId, ConstraintType, ModelId, ParameterId, ValueId};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct ConstraintCreateDBRequest {
    pub model_id: ModelId,
    pub constraint_type: ConstraintType,
    pub from_parameter_id: ParameterId,
    pub from_value_id: ValueId,
    pub target_parameter_id: ParameterId,
    pub target_value_id: ValueId,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ConstraintDBResponse {
    pub id: ConstraintId,
    pub model_id: ModelId,
    pub constraint_type: ConstraintType,
    pub from_parameter_id: ParameterId,
    pub from_value_id: ValueId,
    pub target_parameter_id: ParameterId,
    pub target_value_id: ValueId,
}
