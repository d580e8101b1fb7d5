//! Request decorators and the chain that composes them.
//!
//! A [`Decorator`] wraps a router's routes with one concern. A [`MiddlewareChain`] is an ordered
//! list of decorators; [`MiddlewareChain::apply`] folds them so the first decorator in the list
//! sees the request first. A decorator may short-circuit everything after it in the list, never
//! anything before it.
//!
//! The chains used by the service are:
//!
//! | chain | decorators |
//! |---|---|
//! | [`public`](MiddlewareChain::public) | trace, logging, locale, content type |
//! | [`authenticated`](MiddlewareChain::authenticated) | public + identity |
//! | [`owned`](MiddlewareChain::owned) | authenticated + authorization |
//!
//! Decorators are installed with `route_layer`, so they only run for requests that matched a
//! route and can see its path parameters.

pub mod authorization;
pub mod content_type;
pub mod identity;
pub mod locale;
pub mod logging;
pub mod trace;

use axum::Router;

use crate::AppState;

pub use authorization::Authorization;
pub use content_type::JsonContentType;
pub use identity::Identity;
pub use locale::ResolveLocale;
pub use logging::RequestLogging;
pub use trace::TraceId;

/// One layer of request handling.
pub trait Decorator: Send + Sync {
    /// Short name used in logs and tests
    fn name(&self) -> &'static str;

    /// Wrap every route of `next` with this decorator.
    fn wrap(&self, next: Router<AppState>) -> Router<AppState>;
}

#[derive(Default)]
pub struct MiddlewareChain {
    decorators: Vec<Box<dyn Decorator>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decorator; it runs after every decorator already in the chain.
    pub fn with(mut self, decorator: impl Decorator + 'static) -> Self {
        self.decorators.push(Box::new(decorator));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.decorators.iter().map(|d| d.name()).collect()
    }

    pub fn apply(&self, router: Router<AppState>) -> Router<AppState> {
        // The last layer added is the outermost, so wrap from the back
        self.decorators.iter().rev().fold(router, |router, decorator| decorator.wrap(router))
    }

    /// Decorators every route gets.
    pub fn public(state: &AppState) -> Self {
        Self::new()
            .with(TraceId)
            .with(RequestLogging)
            .with(ResolveLocale::new(state.config.default_locale.clone()))
            .with(JsonContentType)
    }

    /// Routes that need a verified subject.
    pub fn authenticated(state: &AppState) -> Self {
        Self::public(state).with(Identity::new(state.clone()))
    }

    /// Routes under `/models/{model_id}` that the subject must own.
    pub fn owned(state: &AppState) -> Self {
        Self::authenticated(state).with(Authorization::new(state.clone()))
    }
}
