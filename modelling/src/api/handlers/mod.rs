//! HTTP request handlers for all API endpoints.
//!
//! Handlers extract [`crate::context::RequestContext`] when they need the request locale or
//! the authenticated subject, open a connection (or a transaction) from the pool, and call
//! the repositories in [`crate::db::handlers`]. Ownership of the model in the path has
//! already been checked by the time a handler under `/models/{model_id}` runs.
//!
//! - [`auth`]: login
//! - [`models`]: model CRUD
//! - [`parameters`]: parameter CRUD and search
//! - [`values`]: value listing and bulk modification
//! - [`translations`]: parameter and value translations
//! - [`constraints`]: inter-parameter constraints

pub mod auth;
pub mod constraints;
pub mod models;
pub mod parameters;
pub mod translations;
pub mod values;
