use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::{
        extract::JsonBody,
        models::models::{ModelCreate, ModelCreated, ModelDetail, ModelResponse},
    },
    context::RequestContext,
    db::{
        handlers::{Constraints, Models, Repository, Users, models::ModelFilter},
        models::models::ModelCreateDBRequest,
    },
    errors::Error,
    types::ModelId,
};

/// Create a model owned by the caller
#[utoipa::path(
    post,
    path = "/models",
    request_body = ModelCreate,
    tag = "models",
    responses(
        (status = 200, description = "Model created", body = ModelCreated),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not authenticated"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_model(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(request): JsonBody<ModelCreate>,
) -> Result<Json<ModelCreated>, Error> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(Error::BadRequest {
            message: "Model name cannot be empty".to_string(),
        });
    }

    let subject = ctx.subject()?;
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let owner = Users::new(&mut tx)
        .get_user_by_email(&subject.email)
        .await?
        .ok_or_else(|| Error::Unauthenticated {
            message: Some("Unknown user".to_string()),
        })?;

    let model = Models::new(&mut tx)
        .create(&ModelCreateDBRequest {
            name: name.to_string(),
            owner: owner.id,
        })
        .await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(ModelCreated { model_id: model.id }))
}

/// List the caller's models
#[utoipa::path(
    get,
    path = "/models",
    tag = "models",
    params(("lang" = Option<String>, Query, description = "Locale for translations")),
    responses(
        (status = 200, description = "Models owned by the caller", body = [ModelResponse]),
        (status = 401, description = "Not authenticated"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_models(State(state): State<AppState>, ctx: RequestContext) -> Result<Json<Vec<ModelResponse>>, Error> {
    let filter = ModelFilter {
        owner_email: ctx.subject()?.email.clone(),
        locale: ctx.locale()?.clone(),
    };

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let models = Models::new(&mut conn).list(&filter).await?;

    Ok(Json(models.into_iter().map(Into::into).collect()))
}

/// Get a model with its constraints
#[utoipa::path(
    get,
    path = "/models/{model_id}",
    tag = "models",
    params(
        ("model_id" = i32, Path, description = "Model ID"),
        ("lang" = Option<String>, Query, description = "Locale for translations"),
    ),
    responses(
        (status = 200, description = "Model details", body = ModelDetail),
        (status = 403, description = "Not an owner of this model"),
        (status = 404, description = "Model not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_model(State(state): State<AppState>, ctx: RequestContext, Path(model_id): Path<ModelId>) -> Result<Json<ModelDetail>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let model = Models::new(&mut conn)
        .get_by_id(model_id, ctx.locale()?)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Model".to_string(),
            id: model_id.to_string(),
        })?;
    let constraints = Constraints::new(&mut conn).list(&model_id).await?;

    Ok(Json(ModelDetail {
        model: model.into(),
        constraints: constraints.into_iter().map(Into::into).collect(),
    }))
}

/// Delete a model and everything under it
#[utoipa::path(
    delete,
    path = "/models/{model_id}",
    tag = "models",
    params(("model_id" = i32, Path, description = "Model ID")),
    responses(
        (status = 200, description = "Model deleted"),
        (status = 403, description = "Not an owner of this model"),
        (status = 404, description = "Model not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_model(State(state): State<AppState>, Path(model_id): Path<ModelId>) -> Result<StatusCode, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    if !Models::new(&mut conn).delete(model_id).await? {
        return Err(Error::NotFound {
            resource: "Model".to_string(),
            id: model_id.to_string(),
        });
    }

    Ok(StatusCode::OK)
}
