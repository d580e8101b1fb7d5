//! Database models for parameters and their values.

use crate::types::{ModelId, ParameterId, ValueId, ValueType};

#[derive(Debug, Clone)]
pub struct ParameterCreateDBRequest {
    pub model_id: ModelId,
    pub name: String,
    pub value_type: ValueType,
}

/// A parameter together with its ordered values, rebuilt by [`crate::db::aggregate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterAggregate {
    pub id: ParameterId,
    pub name: String,
    /// Name in the request locale, or the base name when untranslated
    pub translation: String,
    pub value_type: ValueType,
    pub values: Vec<ValueEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueEntry {
    pub id: ValueId,
    pub value: String,
    /// Value in the request locale, or empty when untranslated
    pub translation: String,
}

/// A value to insert under a parameter
#[derive(Debug, Clone)]
pub struct NewValueDBRequest {
    pub value: String,
}

/// An existing value to overwrite in place
#[derive(Debug, Clone)]
pub struct UpdatedValueDBRequest {
    pub id: ValueId,
    pub value: String,
}
