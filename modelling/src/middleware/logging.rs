use std::time::Instant;

use axum::{
    Router,
    extract::Request,
    middleware::{Next, from_fn},
    response::Response,
};
use tracing::{info, warn};

use super::Decorator;
use crate::AppState;

/// Logs one line per request once the response is ready. Never alters the response.
pub struct RequestLogging;

impl Decorator for RequestLogging {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn wrap(&self, next: Router<AppState>) -> Router<AppState> {
        next.route_layer(from_fn(log_request))
    }
}

pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_millis() as u64;
    if response.status().is_server_error() {
        warn!(%method, %path, status, latency_ms, "request failed");
    } else {
        info!(%method, %path, status, latency_ms, "request completed");
    }
    response
}
