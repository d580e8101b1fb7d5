//! Records passed in and out of the repositories.
//!
//! These are distinct from the API models in [`crate::api::models`] so that storage and wire
//! representations can evolve independently.

pub mod constraints;
pub mod models;
pub mod parameters;
pub mod translations;
pub mod users;
