use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    api::{
        extract::JsonBody,
        models::parameters::{ModificationResult, ValueModification, ValueResponse},
    },
    context::RequestContext,
    db::{
        handlers::{Values, values::ParameterValues},
        upsert::BulkUpsert,
    },
    errors::Error,
    types::{ModelId, ParameterId},
};

/// List the values of a parameter, translated into the request locale
#[utoipa::path(
    get,
    path = "/models/{model_id}/parameters/{parameter_id}/values",
    tag = "values",
    params(
        ("model_id" = i32, Path, description = "Model ID"),
        ("parameter_id" = i32, Path, description = "Parameter ID"),
        ("lang" = Option<String>, Query, description = "Locale for translations"),
    ),
    responses(
        (status = 200, description = "Values in id order", body = [ValueResponse]),
        (status = 403, description = "Not an owner of this model"),
        (status = 404, description = "Parameter not found in this model"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_values(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((model_id, parameter_id)): Path<(ModelId, ParameterId)>,
) -> Result<Json<Vec<ValueResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let values = Values::new(&mut conn)
        .list(model_id, parameter_id, ctx.locale()?)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Parameter".to_string(),
            id: parameter_id.to_string(),
        })?;

    Ok(Json(values.into_iter().map(Into::into).collect()))
}

/// Add and overwrite values of a parameter in one transaction
#[utoipa::path(
    patch,
    path = "/models/{model_id}/parameters/{parameter_id}/values",
    request_body = ValueModification,
    tag = "values",
    params(
        ("model_id" = i32, Path, description = "Model ID"),
        ("parameter_id" = i32, Path, description = "Parameter ID"),
    ),
    responses(
        (status = 200, description = "All changes applied", body = ModificationResult),
        (status = 400, description = "Malformed request or value not valid for the parameter's type"),
        (status = 403, description = "Not an owner of this model"),
        (status = 404, description = "Parameter, or a value to update, not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn modify_values(
    State(state): State<AppState>,
    Path((model_id, parameter_id)): Path<(ModelId, ParameterId)>,
    JsonBody(request): JsonBody<ValueModification>,
) -> Result<Json<ModificationResult>, Error> {
    let target = ParameterValues { model_id, parameter_id };

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let summary = BulkUpsert::new(&mut conn).apply(&target, &request.into()).await?;

    Ok(Json(summary.into()))
}
