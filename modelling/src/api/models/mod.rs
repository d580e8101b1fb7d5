//! API request and response data models.
//!
//! API models are distinct from the database models in [`crate::db::models`]; handlers
//! convert between the two. Field names are camelCase on the wire.
//!
//! - [`auth`]: login payloads
//! - [`models`]: model creation and the model aggregate
//! - [`parameters`]: parameters, their values and value modification batches
//! - [`translations`]: parameter and value translations and their modification batches
//! - [`constraints`]: constraints between parameter values

pub mod auth;
pub mod constraints;
pub mod models;
pub mod parameters;
pub mod translations;
