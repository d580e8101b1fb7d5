use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::db::{
    models::parameters::{NewValueDBRequest, ParameterAggregate, UpdatedValueDBRequest, ValueEntry},
    upsert::{UpsertBatch, UpsertSummary},
};
use crate::types::{ParameterId, ValueId, ValueType};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParameterCreate {
    pub name: String,
    pub value_type: ValueType,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParameterCreated {
    pub parameter_id: ParameterId,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ParameterListQuery {
    /// Case-insensitive substring of the name or translated name; `*` matches everything
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ValueResponse {
    pub id: ValueId,
    pub value: String,
    /// Value in the request locale, `""` if untranslated
    pub translation: String,
}

impl From<ValueEntry> for ValueResponse {
    fn from(entry: ValueEntry) -> Self {
        Self {
            id: entry.id,
            value: entry.value,
            translation: entry.translation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParameterResponse {
    pub id: ParameterId,
    pub name: String,
    /// Name in the request locale, the base name if untranslated
    pub translation: String,
    pub value_type: ValueType,
    pub values: Vec<ValueResponse>,
}

impl From<ParameterAggregate> for ParameterResponse {
    fn from(aggregate: ParameterAggregate) -> Self {
        Self {
            id: aggregate.id,
            name: aggregate.name,
            translation: aggregate.translation,
            value_type: aggregate.value_type,
            values: aggregate.values.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValueUpdate {
    pub id: ValueId,
    pub value: String,
}

/// New values to add and existing values to overwrite, applied atomically.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueModification {
    pub new_values: Vec<String>,
    pub updated_values: Vec<ValueUpdate>,
}

impl From<ValueModification> for UpsertBatch<NewValueDBRequest, UpdatedValueDBRequest> {
    fn from(request: ValueModification) -> Self {
        UpsertBatch::new(
            request.new_values.into_iter().map(|value| NewValueDBRequest { value }).collect(),
            request
                .updated_values
                .into_iter()
                .map(|v| UpdatedValueDBRequest { id: v.id, value: v.value })
                .collect(),
        )
    }
}

/// Result of a modification batch
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModificationResult {
    /// Ids of the inserted rows, in request order
    pub inserted_ids: Vec<i32>,
    pub updated: usize,
}

impl From<UpsertSummary> for ModificationResult {
    fn from(summary: UpsertSummary) -> Self {
        Self {
            inserted_ids: summary.inserted,
            updated: summary.updated,
        }
    }
}
