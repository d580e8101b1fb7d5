//! Request-scoped context shared by the middleware chain and the handlers.
//!
//! The trace decorator inserts a fresh [`RequestContext`] into the request extensions. Later
//! decorators fill in the locale and the authenticated subject, and handlers extract the
//! finished context and pass it by reference into the repositories.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{errors::Error, types::Locale};

/// The authenticated caller, as asserted by a verified session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    trace_id: Uuid,
    locale: Option<Locale>,
    subject: Option<Subject>,
}

impl RequestContext {
    pub fn new(trace_id: Uuid) -> Self {
        Self {
            trace_id,
            locale: None,
            subject: None,
        }
    }

    pub fn trace_id(&self) -> Uuid {
        self.trace_id
    }

    /// Fix the request's locale. The first call wins; returns `false` if a locale was already set.
    pub fn set_locale(&mut self, locale: Locale) -> bool {
        if self.locale.is_some() {
            tracing::warn!(trace_id = %self.trace_id, attempted = %locale, "locale already resolved for request, ignoring");
            return false;
        }
        self.locale = Some(locale);
        true
    }

    pub fn locale(&self) -> Result<&Locale, Error> {
        self.locale.as_ref().ok_or_else(|| Error::Internal {
            operation: "read request locale before it was resolved".to_string(),
        })
    }

    pub fn set_subject(&mut self, subject: Subject) {
        self.subject = Some(subject);
    }

    /// The authenticated subject. Absence is always treated as a rejection.
    pub fn subject(&self) -> Result<&Subject, Error> {
        self.subject.as_ref().ok_or(Error::Unauthenticated { message: None })
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<RequestContext>().cloned().ok_or_else(|| Error::Internal {
            operation: "read request context (trace decorator not installed)".to_string(),
        })
    }
}
