//! Database models for parameter and value translations.

use crate::types::{TranslationId, ValueId};
use sqlx::FromRow;

/// A per-field, per-language override for a parameter
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ParameterTranslationDBResponse {
    pub id: TranslationId,
    pub field: String,
    pub language: String,
    pub translation: String,
}

#[derive(Debug, Clone)]
pub struct NewParameterTranslationDBRequest {
    pub field: String,
    pub language: String,
    pub translation: String,
}

/// The field a translation belongs to is fixed at insert; updates change only language and text
#[derive(Debug, Clone)]
pub struct UpdatedParameterTranslationDBRequest {
    pub id: TranslationId,
    pub language: String,
    pub translation: String,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ValueTranslationDBResponse {
    pub id: TranslationId,
    pub value_id: ValueId,
    pub language: String,
    pub translation: String,
}

#[derive(Debug, Clone)]
pub struct NewValueTranslationDBRequest {
    pub language: String,
    pub translation: String,
}

#[derive(Debug, Clone)]
pub struct UpdatedValueTranslationDBRequest {
    pub id: TranslationId,
    pub language: String,
    pub translation: String,
}
