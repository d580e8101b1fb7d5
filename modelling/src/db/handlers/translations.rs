//! Database repository for parameter and value translations.

use crate::db::{
    errors::{DbError, Result},
    handlers::{Parameters, Values},
    models::translations::{
        NewParameterTranslationDBRequest, NewValueTranslationDBRequest, ParameterTranslationDBResponse, UpdatedParameterTranslationDBRequest,
        UpdatedValueTranslationDBRequest, ValueTranslationDBResponse,
    },
    upsert::{UpsertBatch, UpsertTarget},
};
use crate::types::{ModelId, ParameterId, ValueId};
use sqlx::PgConnection;
use tracing::instrument;

fn require_non_empty(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DbError::Invalid {
            message: format!("translation {what} cannot be empty"),
        });
    }
    Ok(())
}

pub struct Translations<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Translations<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// All translations of a parameter across fields and languages.
    ///
    /// Returns `None` if the parameter does not belong to `model_id`.
    #[instrument(skip(self), err)]
    pub async fn list_for_parameter(&mut self, model_id: ModelId, parameter_id: ParameterId) -> Result<Option<Vec<ParameterTranslationDBResponse>>> {
        if Parameters::new(&mut *self.db).value_type(model_id, parameter_id).await?.is_none() {
            return Ok(None);
        }

        let translations = sqlx::query_as::<_, ParameterTranslationDBResponse>(
            "SELECT id, field, language, translation FROM parameter_translations WHERE parameter_id = $1 ORDER BY id",
        )
        .bind(parameter_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(Some(translations))
    }

    /// All translations of a value across languages.
    ///
    /// Returns `None` unless the value belongs to the parameter and the parameter to the model.
    #[instrument(skip(self), err)]
    pub async fn list_for_value(
        &mut self,
        model_id: ModelId,
        parameter_id: ParameterId,
        value_id: ValueId,
    ) -> Result<Option<Vec<ValueTranslationDBResponse>>> {
        if !Values::new(&mut *self.db).exists(model_id, parameter_id, value_id).await? {
            return Ok(None);
        }

        let translations = sqlx::query_as::<_, ValueTranslationDBResponse>(
            "SELECT id, value_id, language, translation FROM value_translations WHERE value_id = $1 ORDER BY id",
        )
        .bind(value_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(Some(translations))
    }
}

/// Upsert target for the translations of one parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParameterTranslations {
    pub model_id: ModelId,
    pub parameter_id: ParameterId,
}

#[async_trait::async_trait]
impl UpsertTarget for ParameterTranslations {
    const TABLE: &'static str = "parameter_translations";
    const PARENT_COLUMN: &'static str = "parameter_id";
    const INSERT_COLUMNS: &'static [&'static str] = &["field", "language", "translation"];
    const UPDATE_COLUMNS: &'static [&'static str] = &["language", "translation"];

    type New = NewParameterTranslationDBRequest;
    type Updated = UpdatedParameterTranslationDBRequest;

    async fn prepare(&self, conn: &mut PgConnection, batch: &UpsertBatch<Self::New, Self::Updated>) -> Result<i32> {
        Parameters::new(conn)
            .value_type(self.model_id, self.parameter_id)
            .await?
            .ok_or(DbError::NotFound)?;

        for translation in &batch.new {
            require_non_empty("field", &translation.field)?;
            require_non_empty("language", &translation.language)?;
        }
        for translation in &batch.updated {
            require_non_empty("language", &translation.language)?;
        }

        Ok(self.parameter_id)
    }

    fn insert_values(row: &Self::New) -> Vec<String> {
        vec![row.field.clone(), row.language.clone(), row.translation.clone()]
    }

    fn update_id(row: &Self::Updated) -> i32 {
        row.id
    }

    fn update_values(row: &Self::Updated) -> Vec<String> {
        vec![row.language.clone(), row.translation.clone()]
    }
}

/// Upsert target for the translations of one value.
#[derive(Debug, Clone, Copy)]
pub struct ValueTranslations {
    pub model_id: ModelId,
    pub parameter_id: ParameterId,
    pub value_id: ValueId,
}

#[async_trait::async_trait]
impl UpsertTarget for ValueTranslations {
    const TABLE: &'static str = "value_translations";
    const PARENT_COLUMN: &'static str = "value_id";
    const INSERT_COLUMNS: &'static [&'static str] = &["language", "translation"];
    const UPDATE_COLUMNS: &'static [&'static str] = &["language", "translation"];

    type New = NewValueTranslationDBRequest;
    type Updated = UpdatedValueTranslationDBRequest;

    async fn prepare(&self, conn: &mut PgConnection, batch: &UpsertBatch<Self::New, Self::Updated>) -> Result<i32> {
        if !Values::new(conn).exists(self.model_id, self.parameter_id, self.value_id).await? {
            return Err(DbError::NotFound);
        }

        let languages = batch
            .new
            .iter()
            .map(|t| &t.language)
            .chain(batch.updated.iter().map(|t| &t.language));
        for language in languages {
            require_non_empty("language", language)?;
        }

        Ok(self.value_id)
    }

    fn insert_values(row: &Self::New) -> Vec<String> {
        vec![row.language.clone(), row.translation.clone()]
    }

    fn update_id(row: &Self::Updated) -> i32 {
        row.id
    }

    fn update_values(row: &Self::Updated) -> Vec<String> {
        vec![row.language.clone(), row.translation.clone()]
    }
}
