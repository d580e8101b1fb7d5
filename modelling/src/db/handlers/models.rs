//! Database repository for models.

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::models::{ModelCreateDBRequest, ModelDBResponse},
};
use crate::types::{Locale, ModelId};
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing the models a user owns
#[derive(Debug, Clone)]
pub struct ModelFilter {
    pub owner_email: String,
    pub locale: Locale,
}

pub struct Models<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Models<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Fetch one model with its name resolved in `locale`.
    #[instrument(skip(self), fields(locale = %locale), err)]
    pub async fn get_by_id(&mut self, id: ModelId, locale: &Locale) -> Result<Option<ModelDBResponse>> {
        let model = sqlx::query_as::<_, ModelDBResponse>(
            r#"
            SELECT m.id, m.name, COALESCE(mt.translation, '') AS translation
            FROM models m
            LEFT JOIN model_translations mt ON mt.model_id = m.id AND mt.language = $2
            WHERE m.id = $1
            "#,
        )
        .bind(id)
        .bind(locale.as_str())
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(model)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Models<'c> {
    type CreateRequest = ModelCreateDBRequest;
    type Response = ModelDBResponse;
    type Id = ModelId;
    type Filter = ModelFilter;

    /// Insert the model and its first ownership row. Run inside a transaction so that a model
    /// never exists without an owner.
    #[instrument(skip(self, request), fields(name = %request.name, owner = request.owner), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let id: ModelId = sqlx::query_scalar("INSERT INTO models (name) VALUES ($1) RETURNING id")
            .bind(&request.name)
            .fetch_one(&mut *self.db)
            .await?;

        sqlx::query("INSERT INTO model_user_relations (model_id, user_id) VALUES ($1, $2)")
            .bind(id)
            .bind(request.owner)
            .execute(&mut *self.db)
            .await?;

        Ok(ModelDBResponse {
            id,
            name: request.name.clone(),
            translation: String::new(),
        })
    }

    #[instrument(skip(self, filter), fields(owner = %filter.owner_email, locale = %filter.locale), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let models = sqlx::query_as::<_, ModelDBResponse>(
            r#"
            SELECT m.id, m.name, COALESCE(mt.translation, '') AS translation
            FROM models m
            JOIN model_user_relations r ON r.model_id = m.id
            JOIN users u ON u.id = r.user_id
            LEFT JOIN model_translations mt ON mt.model_id = m.id AND mt.language = $2
            WHERE u.email = $1
            ORDER BY m.id
            "#,
        )
        .bind(&filter.owner_email)
        .bind(filter.locale.as_str())
        .fetch_all(&mut *self.db)
        .await?;

        Ok(models)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM models WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_user;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_list_owned_models(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let other = create_test_user(&pool, "other@example.com").await;

        let mut tx = pool.begin().await.unwrap();
        let mut repo = Models::new(&mut tx);
        let first = repo
            .create(&ModelCreateDBRequest {
                name: "car".to_string(),
                owner: owner.id,
            })
            .await
            .unwrap();
        repo.create(&ModelCreateDBRequest {
            name: "bike".to_string(),
            owner: other.id,
        })
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Models::new(&mut conn);
        let owned = repo
            .list(&ModelFilter {
                owner_email: "owner@example.com".to_string(),
                locale: Locale::new("en"),
            })
            .await
            .unwrap();

        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, first.id);
        assert_eq!(owned[0].name, "car");
        assert_eq!(owned[0].translation, "");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_model_translation_follows_locale(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let mut conn = pool.acquire().await.unwrap();
        let model = Models::new(&mut conn)
            .create(&ModelCreateDBRequest {
                name: "car".to_string(),
                owner: owner.id,
            })
            .await
            .unwrap();

        sqlx::query("INSERT INTO model_translations (model_id, language, translation) VALUES ($1, 'de', 'Auto')")
            .bind(model.id)
            .execute(&mut *conn)
            .await
            .unwrap();

        let mut repo = Models::new(&mut conn);
        let de = repo.get_by_id(model.id, &Locale::new("de")).await.unwrap().unwrap();
        let fr = repo.get_by_id(model.id, &Locale::new("fr")).await.unwrap().unwrap();

        assert_eq!(de.translation, "Auto");
        assert_eq!(fr.translation, "");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_model(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Models::new(&mut conn);
        let model = repo
            .create(&ModelCreateDBRequest {
                name: "car".to_string(),
                owner: owner.id,
            })
            .await
            .unwrap();

        assert!(repo.delete(model.id).await.unwrap());
        assert!(!repo.delete(model.id).await.unwrap());
        assert!(repo.get_by_id(model.id, &Locale::new("en")).await.unwrap().is_none());
    }
}
