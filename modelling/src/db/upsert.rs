//! Transactional bulk insert + update of child rows.
//!
//! A modification request carries rows to insert and rows (by id) to update under one parent.
//! [`BulkUpsert::apply`] writes both inside a single transaction:
//!
//! - all new rows go in one multi-row `INSERT`, with the parent id bound on every row
//! - each updated row gets its own `UPDATE ... WHERE id = $n AND <parent> = $m`
//! - an update that matches nothing is [`DbError::NotFound`]
//!
//! Any failure rolls the whole batch back. The target tables differ only in their columns,
//! which each [`UpsertTarget`] describes.

use sqlx::{Connection, PgConnection, Postgres, QueryBuilder};
use tracing::{instrument, warn};

use crate::db::errors::{DbError, Result};

// Postgres caps a single statement at 65535 bind parameters
const MAX_BIND_PARAMS: usize = u16::MAX as usize;

/// Rows to insert and rows to overwrite under one parent.
#[derive(Debug, Clone)]
pub struct UpsertBatch<N, U> {
    pub new: Vec<N>,
    pub updated: Vec<U>,
}

impl<N, U> UpsertBatch<N, U> {
    pub fn new(new: Vec<N>, updated: Vec<U>) -> Self {
        Self { new, updated }
    }

    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.updated.is_empty()
    }
}

/// Outcome of a committed batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertSummary {
    /// Ids of inserted rows, in request order
    pub inserted: Vec<i32>,
    pub updated: usize,
}

/// A child table written through [`BulkUpsert`].
///
/// Implementors carry the scope the batch is applied under (model, parameter, ...) and
/// resolve it to the parent id in [`prepare`](UpsertTarget::prepare).
#[async_trait::async_trait]
pub trait UpsertTarget: Send + Sync {
    const TABLE: &'static str;
    const PARENT_COLUMN: &'static str;
    /// Columns written on insert, excluding the parent column
    const INSERT_COLUMNS: &'static [&'static str];
    /// Columns overwritten on update
    const UPDATE_COLUMNS: &'static [&'static str];

    type New: Send + Sync;
    type Updated: Send + Sync;

    /// Check the scope and the rows inside the transaction and return the parent id.
    async fn prepare(&self, conn: &mut PgConnection, batch: &UpsertBatch<Self::New, Self::Updated>) -> Result<i32>;

    /// Values for [`INSERT_COLUMNS`](UpsertTarget::INSERT_COLUMNS), in order
    fn insert_values(row: &Self::New) -> Vec<String>;

    fn update_id(row: &Self::Updated) -> i32;

    /// Values for [`UPDATE_COLUMNS`](UpsertTarget::UPDATE_COLUMNS), in order
    fn update_values(row: &Self::Updated) -> Vec<String>;
}

pub struct BulkUpsert<'c> {
    db: &'c mut PgConnection,
}

impl<'c> BulkUpsert<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip_all, fields(table = T::TABLE, new = batch.new.len(), updated = batch.updated.len()), err)]
    pub async fn apply<T: UpsertTarget>(&mut self, target: &T, batch: &UpsertBatch<T::New, T::Updated>) -> Result<UpsertSummary> {
        let mut tx = self.db.begin().await?;

        match write_batch(&mut *tx, target, batch).await {
            Ok(summary) => {
                tx.commit().await?;
                Ok(summary)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(table = T::TABLE, "rollback after failed upsert also failed: {rollback_err}");
                }
                Err(e)
            }
        }
    }
}

async fn write_batch<T: UpsertTarget>(conn: &mut PgConnection, target: &T, batch: &UpsertBatch<T::New, T::Updated>) -> Result<UpsertSummary> {
    let parent_id = target.prepare(conn, batch).await?;

    let inserted = if batch.new.is_empty() {
        Vec::new()
    } else {
        insert_rows::<T>(conn, parent_id, &batch.new).await?
    };

    for row in &batch.updated {
        update_row::<T>(conn, parent_id, row).await?;
    }

    Ok(UpsertSummary {
        inserted,
        updated: batch.updated.len(),
    })
}

async fn insert_rows<T: UpsertTarget>(conn: &mut PgConnection, parent_id: i32, rows: &[T::New]) -> Result<Vec<i32>> {
    let params_per_row = T::INSERT_COLUMNS.len() + 1;
    if rows.len() * params_per_row > MAX_BIND_PARAMS {
        return Err(DbError::Invalid {
            message: format!("too many rows in one request ({} > {})", rows.len(), MAX_BIND_PARAMS / params_per_row),
        });
    }

    let mut query = QueryBuilder::<Postgres>::new(format!(
        "INSERT INTO {} ({}, {}) ",
        T::TABLE,
        T::PARENT_COLUMN,
        T::INSERT_COLUMNS.join(", ")
    ));

    query.push_values(rows, |mut b, row| {
        b.push_bind(parent_id);
        for value in T::insert_values(row) {
            b.push_bind(value);
        }
    });
    query.push(" RETURNING id");

    let ids = query.build_query_scalar::<i32>().fetch_all(&mut *conn).await?;
    Ok(ids)
}

async fn update_row<T: UpsertTarget>(conn: &mut PgConnection, parent_id: i32, row: &T::Updated) -> Result<()> {
    let id = T::update_id(row);
    let mut query = QueryBuilder::<Postgres>::new(format!("UPDATE {} SET ", T::TABLE));

    let mut assignments = query.separated(", ");
    for (column, value) in T::UPDATE_COLUMNS.iter().zip(T::update_values(row)) {
        assignments.push(format!("{column} = "));
        assignments.push_bind_unseparated(value);
    }

    query.push(" WHERE id = ");
    query.push_bind(id);
    query.push(format!(" AND {} = ", T::PARENT_COLUMN));
    query.push_bind(parent_id);

    let result = query.build().execute(&mut *conn).await?;
    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}
