//! Ownership gate for everything under `/models/{model_id}`.
//!
//! The subject must appear in `model_user_relations` for the model in the path. A model that
//! does not exist is indistinguishable from one owned by someone else: both are 403. On a
//! denial the request stops here and the handler never runs.

use axum::{
    Router,
    extract::{RawPathParams, Request, State},
    middleware::{Next, from_fn_with_state},
    response::Response,
};
use tracing::{debug, instrument};

use super::Decorator;
use crate::{
    AppState,
    context::RequestContext,
    db::handlers::Ownership,
    errors::Error,
    types::ModelId,
};

/// Path parameter naming the model being accessed
pub const MODEL_ID_PARAM: &str = "model_id";

pub struct Authorization {
    state: AppState,
}

impl Authorization {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl Decorator for Authorization {
    fn name(&self) -> &'static str {
        "authorization"
    }

    fn wrap(&self, next: Router<AppState>) -> Router<AppState> {
        next.route_layer(from_fn_with_state(self.state.clone(), authorize))
    }
}

fn model_id_from(params: &RawPathParams) -> Result<ModelId, Error> {
    let raw = params
        .iter()
        .find_map(|(key, value)| (key == MODEL_ID_PARAM).then_some(value))
        .ok_or_else(|| Error::Internal {
            operation: format!("authorize a route without a {{{MODEL_ID_PARAM}}} segment"),
        })?;

    raw.parse().map_err(|_| Error::BadRequest {
        message: format!("Invalid model id '{raw}'"),
    })
}

#[instrument(skip_all)]
pub async fn authorize(State(state): State<AppState>, params: RawPathParams, request: Request, next: Next) -> Result<Response, Error> {
    let model_id = model_id_from(&params)?;
    let ctx = request.extensions().get::<RequestContext>().ok_or_else(|| Error::Internal {
        operation: "authorize without a request context".to_string(),
    })?;
    let subject = ctx.subject()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let owners = Ownership::new(&mut conn).count(model_id, &subject.email).await?;

    if owners == 0 {
        debug!(model_id, subject = %subject.email, "ownership check denied");
        return Err(Error::Forbidden {
            resource: format!("model {model_id}"),
        });
    }

    Ok(next.run(request).await)
}
