//! Resolves the request locale from the `lang` query parameter.

use axum::{
    Router,
    extract::{Query, Request, State},
    http::Uri,
    middleware::{Next, from_fn_with_state},
    response::Response,
};
use serde::Deserialize;
use tracing::debug;

use super::Decorator;
use crate::{AppState, context::RequestContext, errors::Error, types::Locale};

#[derive(Debug, Deserialize)]
struct LocaleQuery {
    lang: Option<String>,
}

pub struct ResolveLocale {
    default: Locale,
}

impl ResolveLocale {
    pub fn new(default: Locale) -> Self {
        Self { default }
    }
}

impl Decorator for ResolveLocale {
    fn name(&self) -> &'static str {
        "locale"
    }

    fn wrap(&self, next: Router<AppState>) -> Router<AppState> {
        next.route_layer(from_fn_with_state(self.default.clone(), resolve_locale))
    }
}

/// The `lang` query value if present and non-blank, else `default`.
pub fn locale_for(uri: &Uri, default: &Locale) -> Locale {
    let requested = match Query::<LocaleQuery>::try_from_uri(uri) {
        Ok(Query(query)) => query.lang,
        Err(e) => {
            debug!("Ignoring unparseable query string: {e}");
            None
        }
    };

    requested.as_deref().and_then(Locale::parse).unwrap_or_else(|| default.clone())
}

pub async fn resolve_locale(State(default): State<Locale>, mut request: Request, next: Next) -> Result<Response, Error> {
    let locale = locale_for(request.uri(), &default);

    let ctx = request.extensions_mut().get_mut::<RequestContext>().ok_or_else(|| Error::Internal {
        operation: "resolve locale without a request context".to_string(),
    })?;
    ctx.set_locale(locale);

    Ok(next.run(request).await)
}
