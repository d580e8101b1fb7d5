//! Ownership lookups for the authorization decorator.

use crate::db::errors::Result;
use crate::types::ModelId;
use sqlx::PgConnection;
use tracing::instrument;

pub struct Ownership<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Ownership<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Number of ownership rows linking `email` to `model_id`.
    ///
    /// Zero both when the model does not exist and when it belongs to someone else.
    #[instrument(skip(self), err)]
    pub async fn count(&mut self, model_id: ModelId, email: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM model_user_relations r
            JOIN users u ON u.id = r.user_id
            WHERE r.model_id = $1 AND u.email = $2
            "#,
        )
        .bind(model_id)
        .bind(email)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(count)
    }
}
