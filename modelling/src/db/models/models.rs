//! Database models for configurable models and their ownership.

use crate::types::{ModelId, UserId};
use sqlx::FromRow;

/// Database request for creating a model owned by `owner`
#[derive(Debug, Clone)]
pub struct ModelCreateDBRequest {
    pub name: String,
    pub owner: UserId,
}

/// A model with its name resolved in the requested locale.
///
/// `translation` is empty when the model has no translation for that locale.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ModelDBResponse {
    pub id: ModelId,
    pub name: String,
    pub translation: String,
}
