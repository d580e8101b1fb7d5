//! Database repository for constraints between parameter values.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::{Repository, Scoped},
    models::constraints::{ConstraintCreateDBRequest, ConstraintDBResponse},
};
use crate::types::{ConstraintId, ModelId};
use sqlx::PgConnection;
use tracing::instrument;

const CONSTRAINT_COLUMNS: &str = "id, model_id, constraint_type, from_parameter_id, from_value_id, target_parameter_id, target_value_id";

pub struct Constraints<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Constraints<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Both endpoints must be values of distinct parameters of the constraint's model.
    async fn validate(&mut self, request: &ConstraintCreateDBRequest) -> Result<()> {
        if request.from_parameter_id == request.target_parameter_id {
            return Err(DbError::Invalid {
                message: "a constraint must relate two different parameters".to_string(),
            });
        }

        let matched: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM parameter_values v
            JOIN parameters p ON p.id = v.parameter_id
            WHERE p.model_id = $1
              AND ((p.id = $2 AND v.id = $3) OR (p.id = $4 AND v.id = $5))
            "#,
        )
        .bind(request.model_id)
        .bind(request.from_parameter_id)
        .bind(request.from_value_id)
        .bind(request.target_parameter_id)
        .bind(request.target_value_id)
        .fetch_one(&mut *self.db)
        .await?;

        if matched != 2 {
            return Err(DbError::Invalid {
                message: "constraint references a parameter or value outside this model".to_string(),
            });
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Constraints<'c> {
    type CreateRequest = ConstraintCreateDBRequest;
    type Response = ConstraintDBResponse;
    type Id = Scoped<ConstraintId>;
    type Filter = ModelId;

    #[instrument(skip(self, request), fields(model_id = request.model_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        self.validate(request).await?;

        let constraint = sqlx::query_as::<_, ConstraintDBResponse>(&format!(
            r#"
            INSERT INTO model_constraints
                (model_id, constraint_type, from_parameter_id, from_value_id, target_parameter_id, target_value_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {CONSTRAINT_COLUMNS}
            "#
        ))
        .bind(request.model_id)
        .bind(request.constraint_type)
        .bind(request.from_parameter_id)
        .bind(request.from_value_id)
        .bind(request.target_parameter_id)
        .bind(request.target_value_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(constraint)
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self, model_id: &Self::Filter) -> Result<Vec<Self::Response>> {
        let constraints =
            sqlx::query_as::<_, ConstraintDBResponse>(&format!("SELECT {CONSTRAINT_COLUMNS} FROM model_constraints WHERE model_id = $1 ORDER BY id"))
                .bind(model_id)
                .fetch_all(&mut *self.db)
                .await?;

        Ok(constraints)
    }

    #[instrument(skip(self), fields(model_id = id.model_id, constraint_id = id.id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM model_constraints WHERE id = $1 AND model_id = $2")
            .bind(id.id)
            .bind(id.model_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
