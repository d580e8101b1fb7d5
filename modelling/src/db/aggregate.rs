//! Rebuilds parameter aggregates from flattened join rows.
//!
//! The parameter query joins `parameters` with their locale translation, their values and the
//! values' locale translations. Every parameter contributes one row per value, or a single row
//! with NULL value columns when it has none. Rows arrive ordered by parameter id, then value id.
//!
//! Aggregation runs in two steps:
//!
//! 1. [`group_rows`] splits the rows into runs of equal parameter id, rejecting input where a
//!    parameter id reappears after a different one.
//! 2. [`build_parameter`] turns one run into a [`ParameterAggregate`]. It is pure and performs
//!    no locale matching; the query already restricted translations to the request locale.

use sqlx::FromRow;

use crate::db::{
    errors::{DbError, Result},
    models::parameters::{ParameterAggregate, ValueEntry},
};
use crate::types::{ParameterId, ValueId, ValueType};

/// One row of the parameter ⋈ translation ⋈ value ⋈ translation LEFT JOIN.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ParameterRow {
    pub parameter_id: ParameterId,
    pub name: String,
    pub value_type: ValueType,
    pub parameter_translation: Option<String>,
    pub value_id: Option<ValueId>,
    pub value: Option<String>,
    pub value_translation: Option<String>,
}

/// Split rows into contiguous runs sharing a parameter id, preserving row order.
pub fn group_rows(rows: Vec<ParameterRow>) -> Result<Vec<Vec<ParameterRow>>> {
    let mut groups: Vec<Vec<ParameterRow>> = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for row in rows {
        match groups.last_mut() {
            Some(current) if current[0].parameter_id == row.parameter_id => current.push(row),
            _ => {
                if !seen.insert(row.parameter_id) {
                    return Err(DbError::Aggregation(format!(
                        "parameter {} reappeared after its group was closed; rows must be ordered by parameter id",
                        row.parameter_id
                    )));
                }
                groups.push(vec![row]);
            }
        }
    }

    Ok(groups)
}

/// Build one aggregate from a non-empty run of rows for the same parameter.
pub fn build_parameter(group: Vec<ParameterRow>) -> Option<ParameterAggregate> {
    let first = group.first()?;
    let translation = first.parameter_translation.clone().unwrap_or_else(|| first.name.clone());
    let mut aggregate = ParameterAggregate {
        id: first.parameter_id,
        name: first.name.clone(),
        translation,
        value_type: first.value_type,
        values: Vec::with_capacity(group.len()),
    };

    for row in group {
        // NULL value id: the LEFT JOIN matched no value
        if let Some(id) = row.value_id {
            aggregate.values.push(ValueEntry {
                id,
                value: row.value.unwrap_or_default(),
                translation: row.value_translation.unwrap_or_default(),
            });
        }
    }

    Some(aggregate)
}

/// Group and build in one pass. Any grouping failure discards every partial aggregate.
pub fn aggregate(rows: Vec<ParameterRow>) -> Result<Vec<ParameterAggregate>> {
    Ok(group_rows(rows)?.into_iter().filter_map(build_parameter).collect())
}
