//! Assigns every request a trace id and a fresh [`RequestContext`].

use axum::{
    Router,
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::{Next, from_fn},
    response::Response,
};
use tracing::{Instrument, info_span};
use uuid::Uuid;

use super::Decorator;
use crate::{AppState, context::RequestContext};

/// Response header echoing the request's trace id
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

pub struct TraceId;

impl Decorator for TraceId {
    fn name(&self) -> &'static str {
        "trace"
    }

    fn wrap(&self, next: Router<AppState>) -> Router<AppState> {
        next.route_layer(from_fn(assign_trace_id))
    }
}

pub async fn assign_trace_id(mut request: Request, next: Next) -> Response {
    let trace_id = Uuid::new_v4();
    request.extensions_mut().insert(RequestContext::new(trace_id));

    let span = info_span!("request", %trace_id);
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RequestContext;
    use axum::{body::Body, routing::get};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_trace_id_is_shared_with_handler() {
        let router: Router = Router::new()
            .route("/", get(|ctx: RequestContext| async move { ctx.trace_id().to_string() }))
            .route_layer(from_fn(assign_trace_id));

        let response = router.oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();
        let header = response.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap().to_string();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

        assert_eq!(header, String::from_utf8(body.to_vec()).unwrap());
        assert!(Uuid::parse_str(&header).is_ok());
    }
}
