//! Base repository trait for database operations.

use crate::db::errors::Result;
use crate::types::ModelId;

/// Base repository trait providing common database operations
///
/// A repository is a data access layer over one table. It has separate associated types for
/// create requests and responses, and a filter type for list operations.
#[async_trait::async_trait]
pub trait Repository {
    /// The request type for creating entities
    type CreateRequest;

    /// The response type returned by operations
    type Response;

    /// The identifier type for deletes
    type Id: Send + Sync;

    /// The filter type for list operations
    type Filter: Send + Sync;

    /// Create a new entity
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response>;

    /// List entities matching a filter
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>>;

    /// Delete an entity by ID, returning whether a row was removed
    async fn delete(&mut self, id: Self::Id) -> Result<bool>;
}

/// A child row id together with the model it must belong to.
///
/// Deletes scoped this way never touch rows of another model, even when the caller owns
/// the model in the path and guesses an id from elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scoped<I> {
    pub model_id: ModelId,
    pub id: I,
}

impl<I> Scoped<I> {
    pub fn new(model_id: ModelId, id: I) -> Self {
        Self { model_id, id }
    }
}
