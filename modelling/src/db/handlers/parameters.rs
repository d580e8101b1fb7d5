//! Database repository for parameters.
//!
//! Parameters are read back as [`ParameterAggregate`]s: one LEFT JOIN across the parameter's
//! translation, its values and their translations, folded by [`crate::db::aggregate`].

use crate::db::{
    aggregate::{self, ParameterRow},
    errors::Result,
    handlers::repository::{Repository, Scoped},
    models::parameters::{ParameterAggregate, ParameterCreateDBRequest},
};
use crate::types::{Locale, ModelId, ParameterId, ValueType};
use sqlx::{PgConnection, Postgres, QueryBuilder};
use tracing::instrument;

/// Search term meaning "no filter"
pub const MATCH_ALL: &str = "*";

/// Filter for listing the parameters of one model
#[derive(Debug, Clone)]
pub struct ParameterFilter {
    pub model_id: ModelId,
    pub locale: Locale,
    /// Case-insensitive substring matched against the name and the translated name
    pub search: Option<String>,
}

impl ParameterFilter {
    pub fn new(model_id: ModelId, locale: Locale) -> Self {
        Self {
            model_id,
            locale,
            search: None,
        }
    }

    pub fn with_search(mut self, search: String) -> Self {
        self.search = Some(search);
        self
    }

    fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != MATCH_ALL)
    }
}

pub struct Parameters<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Parameters<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// The value type of a parameter, if it exists within `model_id`.
    #[instrument(skip(self), err)]
    pub async fn value_type(&mut self, model_id: ModelId, parameter_id: ParameterId) -> Result<Option<ValueType>> {
        let value_type = sqlx::query_scalar::<_, ValueType>("SELECT value_type FROM parameters WHERE id = $1 AND model_id = $2")
            .bind(parameter_id)
            .bind(model_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(value_type)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Parameters<'c> {
    type CreateRequest = ParameterCreateDBRequest;
    type Response = ParameterAggregate;
    type Id = Scoped<ParameterId>;
    type Filter = ParameterFilter;

    #[instrument(skip(self, request), fields(model_id = request.model_id, name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let id: ParameterId = sqlx::query_scalar("INSERT INTO parameters (model_id, name, value_type) VALUES ($1, $2, $3) RETURNING id")
            .bind(request.model_id)
            .bind(&request.name)
            .bind(request.value_type)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(ParameterAggregate {
            id,
            name: request.name.clone(),
            translation: request.name.clone(),
            value_type: request.value_type,
            values: Vec::new(),
        })
    }

    #[instrument(skip(self, filter), fields(model_id = filter.model_id, locale = %filter.locale), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        // Locale predicates sit in the ON clauses so untranslated rows survive the join
        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT p.id AS parameter_id, p.name, p.value_type,
                   pt.translation AS parameter_translation,
                   v.id AS value_id, v.value, vt.translation AS value_translation
            FROM parameters p
            LEFT JOIN parameter_translations pt
                   ON pt.parameter_id = p.id AND pt.field = 'name' AND pt.language = "#,
        );
        query.push_bind(filter.locale.as_str());
        query.push(
            r#"
            LEFT JOIN parameter_values v ON v.parameter_id = p.id
            LEFT JOIN value_translations vt ON vt.value_id = v.id AND vt.language = "#,
        );
        query.push_bind(filter.locale.as_str());
        query.push(" WHERE p.model_id = ");
        query.push_bind(filter.model_id);

        if let Some(search) = filter.search_term() {
            let search = search.to_lowercase();
            query.push(" AND (strpos(LOWER(p.name), ");
            query.push_bind(search.clone());
            query.push(") > 0 OR strpos(LOWER(COALESCE(pt.translation, '')), ");
            query.push_bind(search);
            query.push(") > 0)");
        }

        query.push(" ORDER BY p.id, v.id");

        let rows = query.build_query_as::<ParameterRow>().fetch_all(&mut *self.db).await?;
        tracing::debug!("Fetched {} parameter rows", rows.len());

        aggregate::aggregate(rows)
    }

    #[instrument(skip(self), fields(model_id = id.model_id, parameter_id = id.id), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM parameters WHERE id = $1 AND model_id = $2")
            .bind(id.id)
            .bind(id.model_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_model, create_test_parameter, create_test_user};
    use sqlx::PgPool;

    #[test]
    fn test_match_all_search_is_ignored() {
        let filter = ParameterFilter::new(1, Locale::new("en"));
        assert_eq!(filter.clone().with_search("*".to_string()).search_term(), None);
        assert_eq!(filter.clone().with_search("  ".to_string()).search_term(), None);
        assert_eq!(filter.with_search("col".to_string()).search_term(), Some("col"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_aggregates_values(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let model_id = create_test_model(&pool, owner.id, "car").await;
        let (color, _) = create_test_parameter(&pool, model_id, "color", ValueType::StringSet, &["red", "blue"]).await;
        let (doors, _) = create_test_parameter(&pool, model_id, "doors", ValueType::IntSet, &[]).await;

        let mut conn = pool.acquire().await.unwrap();
        let params = Parameters::new(&mut conn)
            .list(&ParameterFilter::new(model_id, Locale::new("en")))
            .await
            .unwrap();

        assert_eq!(params.len(), 2);
        assert_eq!(params[0].id, color);
        assert_eq!(params[0].translation, "color");
        let values: Vec<_> = params[0].values.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(values, vec!["red", "blue"]);
        assert_eq!(params[1].id, doors);
        assert!(params[1].values.is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_resolves_translations_in_locale(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let model_id = create_test_model(&pool, owner.id, "car").await;
        let (color, value_ids) = create_test_parameter(&pool, model_id, "color", ValueType::StringSet, &["red", "blue"]).await;

        sqlx::query("INSERT INTO value_translations (value_id, language, translation) VALUES ($1, 'fr', 'bleu')")
            .bind(value_ids[1])
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO parameter_translations (parameter_id, field, language, translation) VALUES ($1, 'name', 'fr', 'couleur')")
            .bind(color)
            .execute(&pool)
            .await
            .unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Parameters::new(&mut conn);

        let fr = repo.list(&ParameterFilter::new(model_id, Locale::new("fr"))).await.unwrap();
        assert_eq!(fr.len(), 1);
        assert_eq!(fr[0].translation, "couleur");
        assert_eq!(fr[0].values[0].translation, "");
        assert_eq!(fr[0].values[1].translation, "bleu");

        let de = repo.list(&ParameterFilter::new(model_id, Locale::new("de"))).await.unwrap();
        assert_eq!(de[0].translation, "color");
        assert!(de[0].values.iter().all(|v| v.translation.is_empty()));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_search_matches_name_or_translation(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let model_id = create_test_model(&pool, owner.id, "car").await;
        let (color, _) = create_test_parameter(&pool, model_id, "color", ValueType::StringSet, &[]).await;
        let (doors, _) = create_test_parameter(&pool, model_id, "doors", ValueType::IntSet, &[]).await;

        sqlx::query("INSERT INTO parameter_translations (parameter_id, field, language, translation) VALUES ($1, 'name', 'de', 'Türen')")
            .bind(doors)
            .execute(&pool)
            .await
            .unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Parameters::new(&mut conn);

        let by_name = repo
            .list(&ParameterFilter::new(model_id, Locale::new("de")).with_search("COL".to_string()))
            .await
            .unwrap();
        assert_eq!(by_name.iter().map(|p| p.id).collect::<Vec<_>>(), vec![color]);

        let by_translation = repo
            .list(&ParameterFilter::new(model_id, Locale::new("de")).with_search("türen".to_string()))
            .await
            .unwrap();
        assert_eq!(by_translation.iter().map(|p| p.id).collect::<Vec<_>>(), vec![doors]);

        let all = repo
            .list(&ParameterFilter::new(model_id, Locale::new("de")).with_search(MATCH_ALL.to_string()))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_is_scoped_to_model(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let model_a = create_test_model(&pool, owner.id, "a").await;
        let model_b = create_test_model(&pool, owner.id, "b").await;
        let (param, _) = create_test_parameter(&pool, model_a, "color", ValueType::StringSet, &["red"]).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Parameters::new(&mut conn);

        assert!(!repo.delete(Scoped::new(model_b, param)).await.unwrap());
        assert!(repo.delete(Scoped::new(model_a, param)).await.unwrap());
        assert!(repo.value_type(model_a, param).await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_value_type_requires_matching_model(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let model_a = create_test_model(&pool, owner.id, "a").await;
        let model_b = create_test_model(&pool, owner.id, "b").await;
        let (param, _) = create_test_parameter(&pool, model_a, "doors", ValueType::IntSet, &[]).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Parameters::new(&mut conn);

        assert_eq!(repo.value_type(model_a, param).await.unwrap(), Some(ValueType::IntSet));
        assert_eq!(repo.value_type(model_b, param).await.unwrap(), None);
    }
}
