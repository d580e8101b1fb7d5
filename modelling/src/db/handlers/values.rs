//! Database repository for parameter values.

use crate::db::{
    errors::{DbError, Result},
    handlers::Parameters,
    models::parameters::{NewValueDBRequest, UpdatedValueDBRequest, ValueEntry},
    upsert::{UpsertBatch, UpsertTarget},
};
use crate::types::{Locale, ModelId, ParameterId, ValueId};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

#[derive(Debug, FromRow)]
struct ValueRow {
    id: ValueId,
    value: String,
    translation: String,
}

pub struct Values<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Values<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Values of one parameter with their translation in `locale`, ordered by id.
    ///
    /// Returns `None` if the parameter does not belong to `model_id`.
    #[instrument(skip(self), fields(locale = %locale), err)]
    pub async fn list(&mut self, model_id: ModelId, parameter_id: ParameterId, locale: &Locale) -> Result<Option<Vec<ValueEntry>>> {
        if Parameters::new(&mut *self.db).value_type(model_id, parameter_id).await?.is_none() {
            return Ok(None);
        }

        let rows = sqlx::query_as::<_, ValueRow>(
            r#"
            SELECT v.id, v.value, COALESCE(vt.translation, '') AS translation
            FROM parameter_values v
            LEFT JOIN value_translations vt ON vt.value_id = v.id AND vt.language = $2
            WHERE v.parameter_id = $1
            ORDER BY v.id
            "#,
        )
        .bind(parameter_id)
        .bind(locale.as_str())
        .fetch_all(&mut *self.db)
        .await?;

        Ok(Some(
            rows.into_iter()
                .map(|r| ValueEntry {
                    id: r.id,
                    value: r.value,
                    translation: r.translation,
                })
                .collect(),
        ))
    }

    /// Whether `value_id` belongs to `parameter_id`, which belongs to `model_id`.
    #[instrument(skip(self), err)]
    pub async fn exists(&mut self, model_id: ModelId, parameter_id: ParameterId, value_id: ValueId) -> Result<bool> {
        let found: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT 1
            FROM parameter_values v
            JOIN parameters p ON p.id = v.parameter_id
            WHERE v.id = $1 AND p.id = $2 AND p.model_id = $3
            "#,
        )
        .bind(value_id)
        .bind(parameter_id)
        .bind(model_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(found.is_some())
    }
}

/// Upsert target for the values of one parameter.
///
/// Every new and updated value is checked against the parameter's value type before anything
/// is written.
#[derive(Debug, Clone, Copy)]
pub struct ParameterValues {
    pub model_id: ModelId,
    pub parameter_id: ParameterId,
}

#[async_trait::async_trait]
impl UpsertTarget for ParameterValues {
    const TABLE: &'static str = "parameter_values";
    const PARENT_COLUMN: &'static str = "parameter_id";
    const INSERT_COLUMNS: &'static [&'static str] = &["value"];
    const UPDATE_COLUMNS: &'static [&'static str] = &["value"];

    type New = NewValueDBRequest;
    type Updated = UpdatedValueDBRequest;

    async fn prepare(&self, conn: &mut PgConnection, batch: &UpsertBatch<Self::New, Self::Updated>) -> Result<i32> {
        let value_type = Parameters::new(conn)
            .value_type(self.model_id, self.parameter_id)
            .await?
            .ok_or(DbError::NotFound)?;

        let candidates = batch
            .new
            .iter()
            .map(|v| v.value.as_str())
            .chain(batch.updated.iter().map(|v| v.value.as_str()));
        for value in candidates {
            if !value_type.accepts(value) {
                return Err(DbError::Invalid {
                    message: format!("'{value}' is not a valid value for a {value_type} parameter"),
                });
            }
        }

        Ok(self.parameter_id)
    }

    fn insert_values(row: &Self::New) -> Vec<String> {
        vec![row.value.clone()]
    }

    fn update_id(row: &Self::Updated) -> i32 {
        row.id
    }

    fn update_values(row: &Self::Updated) -> Vec<String> {
        vec![row.value.clone()]
    }
}
