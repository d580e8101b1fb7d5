//! Translation listing and bulk modification for parameters and their values.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    api::{
        extract::JsonBody,
        models::{
            parameters::ModificationResult,
            translations::{TranslationModification, TranslationResponse, ValueTranslationModification, ValueTranslationResponse},
        },
    },
    db::{
        handlers::{
            Translations,
            translations::{ParameterTranslations, ValueTranslations},
        },
        upsert::BulkUpsert,
    },
    errors::Error,
    types::{ModelId, ParameterId, ValueId},
};

/// List every translation of a parameter
#[utoipa::path(
    get,
    path = "/models/{model_id}/parameters/{parameter_id}/translations",
    tag = "translations",
    params(
        ("model_id" = i32, Path, description = "Model ID"),
        ("parameter_id" = i32, Path, description = "Parameter ID"),
    ),
    responses(
        (status = 200, description = "Translations across all fields and languages", body = [TranslationResponse]),
        (status = 403, description = "Not an owner of this model"),
        (status = 404, description = "Parameter not found in this model"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_parameter_translations(
    State(state): State<AppState>,
    Path((model_id, parameter_id)): Path<(ModelId, ParameterId)>,
) -> Result<Json<Vec<TranslationResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let translations = Translations::new(&mut conn)
        .list_for_parameter(model_id, parameter_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Parameter".to_string(),
            id: parameter_id.to_string(),
        })?;

    Ok(Json(translations.into_iter().map(Into::into).collect()))
}

/// Add and overwrite translations of a parameter in one transaction
#[utoipa::path(
    patch,
    path = "/models/{model_id}/parameters/{parameter_id}/translations",
    request_body = TranslationModification,
    tag = "translations",
    params(
        ("model_id" = i32, Path, description = "Model ID"),
        ("parameter_id" = i32, Path, description = "Parameter ID"),
    ),
    responses(
        (status = 200, description = "All changes applied", body = ModificationResult),
        (status = 400, description = "Malformed request"),
        (status = 403, description = "Not an owner of this model"),
        (status = 404, description = "Parameter, or a translation to update, not found"),
        (status = 409, description = "A translation for this field and language already exists"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn modify_parameter_translations(
    State(state): State<AppState>,
    Path((model_id, parameter_id)): Path<(ModelId, ParameterId)>,
    JsonBody(request): JsonBody<TranslationModification>,
) -> Result<Json<ModificationResult>, Error> {
    let target = ParameterTranslations { model_id, parameter_id };

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let summary = BulkUpsert::new(&mut conn).apply(&target, &request.into()).await?;

    Ok(Json(summary.into()))
}

/// List every translation of a value
#[utoipa::path(
    get,
    path = "/models/{model_id}/parameters/{parameter_id}/values/{value_id}/translations",
    tag = "translations",
    params(
        ("model_id" = i32, Path, description = "Model ID"),
        ("parameter_id" = i32, Path, description = "Parameter ID"),
        ("value_id" = i32, Path, description = "Value ID"),
    ),
    responses(
        (status = 200, description = "Translations across all languages", body = [ValueTranslationResponse]),
        (status = 403, description = "Not an owner of this model"),
        (status = 404, description = "Value not found under this parameter"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_value_translations(
    State(state): State<AppState>,
    Path((model_id, parameter_id, value_id)): Path<(ModelId, ParameterId, ValueId)>,
) -> Result<Json<Vec<ValueTranslationResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let translations = Translations::new(&mut conn)
        .list_for_value(model_id, parameter_id, value_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Value".to_string(),
            id: value_id.to_string(),
        })?;

    Ok(Json(translations.into_iter().map(Into::into).collect()))
}

/// Add and overwrite translations of a value in one transaction
#[utoipa::path(
    patch,
    path = "/models/{model_id}/parameters/{parameter_id}/values/{value_id}/translations",
    request_body = ValueTranslationModification,
    tag = "translations",
    params(
        ("model_id" = i32, Path, description = "Model ID"),
        ("parameter_id" = i32, Path, description = "Parameter ID"),
        ("value_id" = i32, Path, description = "Value ID"),
    ),
    responses(
        (status = 200, description = "All changes applied", body = ModificationResult),
        (status = 400, description = "Malformed request"),
        (status = 403, description = "Not an owner of this model"),
        (status = 404, description = "Value, or a translation to update, not found"),
        (status = 409, description = "A translation for this language already exists"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn modify_value_translations(
    State(state): State<AppState>,
    Path((model_id, parameter_id, value_id)): Path<(ModelId, ParameterId, ValueId)>,
    JsonBody(request): JsonBody<ValueTranslationModification>,
) -> Result<Json<ModificationResult>, Error> {
    let target = ValueTranslations {
        model_id,
        parameter_id,
        value_id,
    };

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let summary = BulkUpsert::new(&mut conn).apply(&target, &request.into()).await?;

    Ok(Json(summary.into()))
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::{
            parameters::{ModificationResult, ParameterResponse},
            translations::{TranslationResponse, ValueTranslationResponse},
        },
        test_utils::{bearer_for, create_test_config, create_test_model, create_test_parameter, create_test_server, create_test_user},
        types::ValueType,
    };
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_parameter_translation_changes_listing(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let model_id = create_test_model(&pool, owner.id, "car").await;
        let (param, _) = create_test_parameter(&pool, model_id, "color", ValueType::StringSet, &[]).await;
        let server = create_test_server(pool);
        let token = bearer_for("owner@example.com", &create_test_config());
        let path = format!("/models/{model_id}/parameters/{param}/translations");

        let added: ModificationResult = server
            .patch(&path)
            .add_header("authorization", token.clone())
            .json(&json!({"newTranslations": [{"field": "name", "language": "fr", "value": "coleur"}]}))
            .await
            .json();

        server
            .patch(&path)
            .add_header("authorization", token.clone())
            .json(&json!({"updatedTranslations": [
                {"id": added.inserted_ids[0], "language": "fr", "value": "couleur"}
            ]}))
            .await
            .assert_status_ok();

        let listed: Vec<TranslationResponse> = server.get(&path).add_header("authorization", token.clone()).await.json();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].value, "couleur");

        let parameters: Vec<ParameterResponse> = server
            .get(&format!("/models/{model_id}/parameters"))
            .add_query_param("lang", "fr")
            .add_header("authorization", token)
            .await
            .json();
        assert_eq!(parameters[0].translation, "couleur");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_keeps_translation_field(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let model_id = create_test_model(&pool, owner.id, "car").await;
        let (param, _) = create_test_parameter(&pool, model_id, "color", ValueType::StringSet, &[]).await;
        let server = create_test_server(pool);
        let token = bearer_for("owner@example.com", &create_test_config());
        let path = format!("/models/{model_id}/parameters/{param}/translations");

        let added: ModificationResult = server
            .patch(&path)
            .add_header("authorization", token.clone())
            .json(&json!({"newTranslations": [{"field": "name", "language": "de", "value": "Farbe"}]}))
            .await
            .json();

        server
            .patch(&path)
            .add_header("authorization", token.clone())
            .json(&json!({"updatedTranslations": [
                {"id": added.inserted_ids[0], "field": "description", "language": "de", "value": "Lackfarbe"}
            ]}))
            .await
            .assert_status_ok();

        let listed: Vec<TranslationResponse> = server.get(&path).add_header("authorization", token).await.json();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, added.inserted_ids[0]);
        assert_eq!(listed[0].field, "name");
        assert_eq!(listed[0].value, "Lackfarbe");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_duplicate_language_is_conflict(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let model_id = create_test_model(&pool, owner.id, "car").await;
        let (param, _) = create_test_parameter(&pool, model_id, "color", ValueType::StringSet, &[]).await;
        let server = create_test_server(pool);
        let token = bearer_for("owner@example.com", &create_test_config());
        let path = format!("/models/{model_id}/parameters/{param}/translations");

        server
            .patch(&path)
            .add_header("authorization", token.clone())
            .json(&json!({"newTranslations": [
                {"field": "name", "language": "fr", "value": "couleur"},
                {"field": "name", "language": "fr", "value": "teinte"}
            ]}))
            .await
            .assert_status(StatusCode::CONFLICT);

        let listed: Vec<TranslationResponse> = server.get(&path).add_header("authorization", token).await.json();
        assert!(listed.is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_value_translations(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let model_id = create_test_model(&pool, owner.id, "car").await;
        let (param, ids) = create_test_parameter(&pool, model_id, "color", ValueType::StringSet, &["red", "blue"]).await;
        let server = create_test_server(pool);
        let token = bearer_for("owner@example.com", &create_test_config());
        let path = format!("/models/{model_id}/parameters/{param}/values/{}/translations", ids[1]);

        server
            .patch(&path)
            .add_header("authorization", token.clone())
            .json(&json!({"newTranslations": [{"language": "fr", "value": "bleu"}]}))
            .await
            .assert_status_ok();

        let listed: Vec<ValueTranslationResponse> = server.get(&path).add_header("authorization", token.clone()).await.json();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].value_id, ids[1]);
        assert_eq!(listed[0].value, "bleu");

        // Value id paired with the wrong parameter
        server
            .get(&format!("/models/{model_id}/parameters/{}/values/{}/translations", param + 1, ids[1]))
            .add_header("authorization", token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
