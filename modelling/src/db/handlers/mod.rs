//! Repository implementations for database access.
//!
//! Each repository wraps a `&mut PgConnection` (a pooled connection or a transaction) and
//! returns records from [`crate::db::models`].
//!
//! # Available Repositories
//!
//! - [`Users`]: accounts and credentials
//! - [`Models`]: models and their owners
//! - [`Ownership`]: the ownership check behind the authorization decorator
//! - [`Parameters`]: parameters, read back as aggregates with their values
//! - [`Values`]: value listing, plus the [`values::ParameterValues`] upsert target
//! - [`Translations`]: translation listing, plus the parameter and value translation upsert targets
//! - [`Constraints`]: inter-parameter constraints

pub mod constraints;
pub mod models;
pub mod ownership;
pub mod parameters;
pub mod repository;
pub mod translations;
pub mod users;
pub mod values;

pub use constraints::Constraints;
pub use models::Models;
pub use ownership::Ownership;
pub use parameters::Parameters;
pub use repository::{Repository, Scoped};
pub use translations::Translations;
pub use users::Users;
pub use values::Values;
