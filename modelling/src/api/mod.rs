//! HTTP layer: request/response models and axum handlers.
//!
//! - **[`handlers`]**: route handlers, one module per resource
//! - **[`models`]**: JSON payloads (camelCase on the wire) with `utoipa` schemas
//! - **[`extract`]**: extractors that turn rejections into [`crate::errors::Error`]
//!
//! # Routes
//!
//! - **Authentication** (`/login`)
//! - **Models** (`/models`, `/models/{model_id}`)
//! - **Parameters** (`/models/{model_id}/parameters/*`): parameters, their values and translations
//! - **Constraints** (`/models/{model_id}/constraints/*`)
//!
//! Everything under `/models/{model_id}` is behind the ownership gate; see
//! [`crate::middleware`].

pub mod extract;
pub mod handlers;
pub mod models;
