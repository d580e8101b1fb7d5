use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::{
        extract::JsonBody,
        models::parameters::{ParameterCreate, ParameterCreated, ParameterListQuery, ParameterResponse},
    },
    context::RequestContext,
    db::{
        handlers::{Parameters, Repository, Scoped, parameters::ParameterFilter},
        models::parameters::ParameterCreateDBRequest,
    },
    errors::Error,
    types::{ModelId, ParameterId},
};

/// Add a parameter to a model
#[utoipa::path(
    post,
    path = "/models/{model_id}/parameters",
    request_body = ParameterCreate,
    tag = "parameters",
    params(("model_id" = i32, Path, description = "Model ID")),
    responses(
        (status = 200, description = "Parameter created", body = ParameterCreated),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Not an owner of this model"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_parameter(
    State(state): State<AppState>,
    Path(model_id): Path<ModelId>,
    JsonBody(request): JsonBody<ParameterCreate>,
) -> Result<Json<ParameterCreated>, Error> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(Error::BadRequest {
            message: "Parameter name cannot be empty".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let parameter = Parameters::new(&mut conn)
        .create(&ParameterCreateDBRequest {
            model_id,
            name: name.to_string(),
            value_type: request.value_type,
        })
        .await?;

    Ok(Json(ParameterCreated { parameter_id: parameter.id }))
}

/// List a model's parameters with their values, translated into the request locale
#[utoipa::path(
    get,
    path = "/models/{model_id}/parameters",
    tag = "parameters",
    params(
        ("model_id" = i32, Path, description = "Model ID"),
        ParameterListQuery,
        ("lang" = Option<String>, Query, description = "Locale for translations"),
    ),
    responses(
        (status = 200, description = "Parameters of the model", body = [ParameterResponse]),
        (status = 403, description = "Not an owner of this model"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_parameters(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(model_id): Path<ModelId>,
    Query(query): Query<ParameterListQuery>,
) -> Result<Json<Vec<ParameterResponse>>, Error> {
    let mut filter = ParameterFilter::new(model_id, ctx.locale()?.clone());
    if let Some(search) = query.search {
        filter = filter.with_search(search);
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let parameters = Parameters::new(&mut conn).list(&filter).await?;

    Ok(Json(parameters.into_iter().map(Into::into).collect()))
}

/// Delete a parameter with its values and translations
#[utoipa::path(
    delete,
    path = "/models/{model_id}/parameters/{parameter_id}",
    tag = "parameters",
    params(
        ("model_id" = i32, Path, description = "Model ID"),
        ("parameter_id" = i32, Path, description = "Parameter ID"),
    ),
    responses(
        (status = 200, description = "Parameter deleted"),
        (status = 403, description = "Not an owner of this model"),
        (status = 404, description = "Parameter not found in this model"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_parameter(
    State(state): State<AppState>,
    Path((model_id, parameter_id)): Path<(ModelId, ParameterId)>,
) -> Result<StatusCode, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    if !Parameters::new(&mut conn).delete(Scoped::new(model_id, parameter_id)).await? {
        return Err(Error::NotFound {
            resource: "Parameter".to_string(),
            id: parameter_id.to_string(),
        });
    }

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::parameters::{ParameterCreated, ParameterResponse},
        test_utils::{bearer_for, create_test_config, create_test_model, create_test_parameter, create_test_server, create_test_user},
        types::ValueType,
    };
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_list_parameters(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let model_id = create_test_model(&pool, owner.id, "car").await;
        let server = create_test_server(pool);
        let token = bearer_for("owner@example.com", &create_test_config());

        let created: ParameterCreated = server
            .post(&format!("/models/{model_id}/parameters"))
            .add_header("authorization", token.clone())
            .json(&json!({"name": "doors", "valueType": "int_set"}))
            .await
            .json();

        let listed: Vec<ParameterResponse> = server
            .get(&format!("/models/{model_id}/parameters"))
            .add_header("authorization", token)
            .await
            .json();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.parameter_id);
        assert_eq!(listed[0].translation, "doors");
        assert_eq!(listed[0].value_type, ValueType::IntSet);
        assert!(listed[0].values.is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_unknown_value_type_is_bad_request(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let model_id = create_test_model(&pool, owner.id, "car").await;
        let server = create_test_server(pool);

        server
            .post(&format!("/models/{model_id}/parameters"))
            .add_header("authorization", bearer_for("owner@example.com", &create_test_config()))
            .json(&json!({"name": "doors", "valueType": "float_set"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_in_requested_locale(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let model_id = create_test_model(&pool, owner.id, "car").await;
        let (color, values) = create_test_parameter(&pool, model_id, "color", ValueType::StringSet, &["red", "blue"]).await;
        sqlx::query("INSERT INTO value_translations (value_id, language, translation) VALUES ($1, 'fr', 'bleu')")
            .bind(values[1])
            .execute(&pool)
            .await
            .unwrap();
        let server = create_test_server(pool);
        let token = bearer_for("owner@example.com", &create_test_config());

        let fr: Vec<ParameterResponse> = server
            .get(&format!("/models/{model_id}/parameters"))
            .add_query_param("lang", "fr")
            .add_header("authorization", token)
            .await
            .json();

        assert_eq!(fr[0].id, color);
        let translations: Vec<_> = fr[0].values.iter().map(|v| (v.id, v.translation.as_str())).collect();
        assert_eq!(translations, vec![(values[0], ""), (values[1], "bleu")]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_search(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let model_id = create_test_model(&pool, owner.id, "car").await;
        let (color, _) = create_test_parameter(&pool, model_id, "color", ValueType::StringSet, &[]).await;
        create_test_parameter(&pool, model_id, "doors", ValueType::IntSet, &[]).await;
        let server = create_test_server(pool);
        let token = bearer_for("owner@example.com", &create_test_config());

        let matched: Vec<ParameterResponse> = server
            .get(&format!("/models/{model_id}/parameters"))
            .add_query_param("search", "olo")
            .add_header("authorization", token.clone())
            .await
            .json();
        assert_eq!(matched.iter().map(|p| p.id).collect::<Vec<_>>(), vec![color]);

        let all: Vec<ParameterResponse> = server
            .get(&format!("/models/{model_id}/parameters"))
            .add_query_param("search", "*")
            .add_header("authorization", token)
            .await
            .json();
        assert_eq!(all.len(), 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_parameter_of_other_model_is_not_found(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let model_a = create_test_model(&pool, owner.id, "a").await;
        let model_b = create_test_model(&pool, owner.id, "b").await;
        let (param, _) = create_test_parameter(&pool, model_a, "color", ValueType::StringSet, &["red"]).await;
        let server = create_test_server(pool);
        let token = bearer_for("owner@example.com", &create_test_config());

        server
            .delete(&format!("/models/{model_b}/parameters/{param}"))
            .add_header("authorization", token.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .delete(&format!("/models/{model_a}/parameters/{param}"))
            .add_header("authorization", token)
            .await
            .assert_status_ok();
    }
}
