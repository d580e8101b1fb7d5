use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::{
    models::translations::{
        NewParameterTranslationDBRequest, NewValueTranslationDBRequest, ParameterTranslationDBResponse, UpdatedParameterTranslationDBRequest,
        UpdatedValueTranslationDBRequest, ValueTranslationDBResponse,
    },
    upsert::UpsertBatch,
};
use crate::types::{TranslationId, ValueId};

/// A translation of one field of a parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TranslationResponse {
    pub id: TranslationId,
    pub field: String,
    pub language: String,
    pub value: String,
}

impl From<ParameterTranslationDBResponse> for TranslationResponse {
    fn from(db: ParameterTranslationDBResponse) -> Self {
        Self {
            id: db.id,
            field: db.field,
            language: db.language,
            value: db.translation,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewTranslation {
    pub field: String,
    pub language: String,
    pub value: String,
}

/// Changes the language and text of an existing translation. Its field cannot be changed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranslationUpdate {
    pub id: TranslationId,
    pub language: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationModification {
    pub new_translations: Vec<NewTranslation>,
    pub updated_translations: Vec<TranslationUpdate>,
}

impl From<TranslationModification> for UpsertBatch<NewParameterTranslationDBRequest, UpdatedParameterTranslationDBRequest> {
    fn from(request: TranslationModification) -> Self {
        UpsertBatch::new(
            request
                .new_translations
                .into_iter()
                .map(|t| NewParameterTranslationDBRequest {
                    field: t.field,
                    language: t.language,
                    translation: t.value,
                })
                .collect(),
            request
                .updated_translations
                .into_iter()
                .map(|t| UpdatedParameterTranslationDBRequest {
                    id: t.id,
                    language: t.language,
                    translation: t.value,
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValueTranslationResponse {
    pub id: TranslationId,
    pub value_id: ValueId,
    pub language: String,
    pub value: String,
}

impl From<ValueTranslationDBResponse> for ValueTranslationResponse {
    fn from(db: ValueTranslationDBResponse) -> Self {
        Self {
            id: db.id,
            value_id: db.value_id,
            language: db.language,
            value: db.translation,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewValueTranslation {
    pub language: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValueTranslationUpdate {
    pub id: TranslationId,
    pub language: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueTranslationModification {
    pub new_translations: Vec<NewValueTranslation>,
    pub updated_translations: Vec<ValueTranslationUpdate>,
}

impl From<ValueTranslationModification> for UpsertBatch<NewValueTranslationDBRequest, UpdatedValueTranslationDBRequest> {
    fn from(request: ValueTranslationModification) -> Self {
        UpsertBatch::new(
            request
                .new_translations
                .into_iter()
                .map(|t| NewValueTranslationDBRequest {
                    language: t.language,
                    translation: t.value,
                })
                .collect(),
            request
                .updated_translations
                .into_iter()
                .map(|t| UpdatedValueTranslationDBRequest {
                    id: t.id,
                    language: t.language,
                    translation: t.value,
                })
                .collect(),
        )
    }
}
