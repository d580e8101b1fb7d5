//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐     ┌─────────────┐
//! │ Repositories│ ──→ │ aggregate / │
//! │             │     │ upsert      │
//! └──────┬──────┘     └─────────────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations
//! - [`models`]: Records passed in and out of the repositories
//! - [`aggregate`]: Rebuilds parameter aggregates from flattened LEFT JOIN rows
//! - [`upsert`]: Transactional bulk insert + update of child rows
//! - [`errors`]: Database-specific error types
//!
//! # Transactions
//!
//! Repositories take a `&mut PgConnection`, so they can be handed either a pooled
//! connection (reads) or a transaction (multi-statement writes):
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let model = Models::new(&mut tx).create(&request).await?;
//! tx.commit().await?;
//! ```
//!
//! [`upsert::BulkUpsert`] opens its own transaction on the connection it is given, which
//! becomes a savepoint when that connection is already inside one.

pub mod aggregate;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod upsert;
