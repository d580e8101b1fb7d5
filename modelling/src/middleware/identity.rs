//! Verifies the session token and records the subject on the request context.
//!
//! A missing, malformed, expired or wrongly signed token ends the request with 401 before any
//! later decorator or the handler runs.

use axum::{
    Router,
    extract::{Request, State},
    middleware::{Next, from_fn_with_state},
    response::Response,
};
use tracing::trace;

use super::Decorator;
use crate::{
    AppState,
    auth::{credentials, session},
    context::RequestContext,
    errors::Error,
};

pub struct Identity {
    state: AppState,
}

impl Identity {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl Decorator for Identity {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn wrap(&self, next: Router<AppState>) -> Router<AppState> {
        next.route_layer(from_fn_with_state(self.state.clone(), authenticate))
    }
}

pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Result<Response, Error> {
    let token = credentials::find_token(request.headers(), &state.config.auth).ok_or(Error::Unauthenticated { message: None })?;
    let subject = session::verify_session_token(token, &state.config)?;
    trace!("Authenticated subject: {}", subject.email);

    let ctx = request.extensions_mut().get_mut::<RequestContext>().ok_or_else(|| Error::Internal {
        operation: "authenticate without a request context".to_string(),
    })?;
    ctx.set_subject(subject);

    Ok(next.run(request).await)
}
