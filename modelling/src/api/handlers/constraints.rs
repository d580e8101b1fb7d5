use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::{
        extract::JsonBody,
        models::constraints::{ConstraintCreate, ConstraintResponse},
    },
    db::{
        handlers::{Constraints, Repository, Scoped},
        models::constraints::ConstraintCreateDBRequest,
    },
    errors::Error,
    types::{ConstraintId, ModelId},
};

/// List a model's constraints
#[utoipa::path(
    get,
    path = "/models/{model_id}/constraints",
    tag = "constraints",
    params(("model_id" = i32, Path, description = "Model ID")),
    responses(
        (status = 200, description = "Constraints of the model", body = [ConstraintResponse]),
        (status = 403, description = "Not an owner of this model"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_constraints(State(state): State<AppState>, Path(model_id): Path<ModelId>) -> Result<Json<Vec<ConstraintResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let constraints = Constraints::new(&mut conn).list(&model_id).await?;

    Ok(Json(constraints.into_iter().map(Into::into).collect()))
}

/// Relate a value of one parameter to a value of another
#[utoipa::path(
    post,
    path = "/models/{model_id}/constraints",
    request_body = ConstraintCreate,
    tag = "constraints",
    params(("model_id" = i32, Path, description = "Model ID")),
    responses(
        (status = 200, description = "Constraint created", body = ConstraintResponse),
        (status = 400, description = "Malformed request or endpoints outside this model"),
        (status = 403, description = "Not an owner of this model"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_constraint(
    State(state): State<AppState>,
    Path(model_id): Path<ModelId>,
    JsonBody(request): JsonBody<ConstraintCreate>,
) -> Result<Json<ConstraintResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let constraint = Constraints::new(&mut conn)
        .create(&ConstraintCreateDBRequest {
            model_id,
            constraint_type: request.constraint_type,
            from_parameter_id: request.from_id,
            from_value_id: request.from_value_id,
            target_parameter_id: request.target_id,
            target_value_id: request.target_value_id,
        })
        .await?;

    Ok(Json(constraint.into()))
}

#[utoipa::path(
    delete,
    path = "/models/{model_id}/constraints/{constraint_id}",
    tag = "constraints",
    params(
        ("model_id" = i32, Path, description = "Model ID"),
        ("constraint_id" = i32, Path, description = "Constraint ID"),
    ),
    responses(
        (status = 200, description = "Constraint deleted"),
        (status = 403, description = "Not an owner of this model"),
        (status = 404, description = "Constraint not found in this model"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_constraint(
    State(state): State<AppState>,
    Path((model_id, constraint_id)): Path<(ModelId, ConstraintId)>,
) -> Result<StatusCode, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    if !Constraints::new(&mut conn).delete(Scoped::new(model_id, constraint_id)).await? {
        return Err(Error::NotFound {
            resource: "Constraint".to_string(),
            id: constraint_id.to_string(),
        });
    }

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::{constraints::ConstraintResponse, models::ModelDetail},
        test_utils::{bearer_for, create_test_config, create_test_model, create_test_parameter, create_test_server, create_test_user},
        types::{ConstraintType, ValueType},
    };
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_constraint_lifecycle(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let model_id = create_test_model(&pool, owner.id, "car").await;
        let (engine, engine_values) = create_test_parameter(&pool, model_id, "engine", ValueType::StringSet, &["electric"]).await;
        let (tank, tank_values) = create_test_parameter(&pool, model_id, "tank", ValueType::IntSet, &["60"]).await;
        let server = create_test_server(pool);
        let token = bearer_for("owner@example.com", &create_test_config());

        let created: ConstraintResponse = server
            .post(&format!("/models/{model_id}/constraints"))
            .add_header("authorization", token.clone())
            .json(&json!({
                "type": "excludes",
                "fromId": engine,
                "fromValueId": engine_values[0],
                "targetId": tank,
                "targetValueId": tank_values[0]
            }))
            .await
            .json();
        assert_eq!(created.constraint_type, ConstraintType::Excludes);

        let model: ModelDetail = server
            .get(&format!("/models/{model_id}"))
            .add_header("authorization", token.clone())
            .await
            .json();
        assert_eq!(model.constraints, vec![created.clone()]);

        server
            .delete(&format!("/models/{model_id}/constraints/{}", created.id))
            .add_header("authorization", token.clone())
            .await
            .assert_status_ok();

        let listed: Vec<ConstraintResponse> = server
            .get(&format!("/models/{model_id}/constraints"))
            .add_header("authorization", token)
            .await
            .json();
        assert!(listed.is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_constraint_on_foreign_value_is_bad_request(pool: PgPool) {
        let owner = create_test_user(&pool, "owner@example.com").await;
        let model_id = create_test_model(&pool, owner.id, "car").await;
        let (engine, engine_values) = create_test_parameter(&pool, model_id, "engine", ValueType::StringSet, &["electric"]).await;
        let (tank, _) = create_test_parameter(&pool, model_id, "tank", ValueType::IntSet, &["60"]).await;
        let server = create_test_server(pool);

        server
            .post(&format!("/models/{model_id}/constraints"))
            .add_header("authorization", bearer_for("owner@example.com", &create_test_config()))
            .json(&json!({
                "type": "requires",
                "fromId": engine,
                "fromValueId": engine_values[0],
                "targetId": tank,
                "targetValueId": engine_values[0]
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
