use axum::{
    Router,
    http::{HeaderValue, header::CONTENT_TYPE},
};
use tower_http::set_header::SetResponseHeaderLayer;

use super::Decorator;
use crate::AppState;

/// Marks responses as JSON unless the handler already chose a content type.
pub struct JsonContentType;

impl Decorator for JsonContentType {
    fn name(&self) -> &'static str {
        "content_type"
    }

    fn wrap(&self, next: Router<AppState>) -> Router<AppState> {
        next.route_layer(SetResponseHeaderLayer::if_not_present(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::Request, http::StatusCode, routing::delete};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_bodyless_response_gets_json_content_type() {
        let router: Router = Router::new()
            .route("/", delete(|| async { StatusCode::OK }))
            .route_layer(SetResponseHeaderLayer::if_not_present(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ));

        let response = router.oneshot(Request::delete("/").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    }
}
