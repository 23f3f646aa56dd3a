//! Discrete / continuous classification of numeric columns.

use crate::error::{PlotError, Result};
use crate::stats::distinct_count;
use crate::table::{Column, Table};
use error_stack::Report;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Uniqueness ratio below which a whole-number column counts as discrete.
pub const DEFAULT_RATIO_THRESHOLD: f64 = 0.05;

/// Decide whether a numeric column holds a small set of repeated integers.
///
/// The uniqueness ratio divides the distinct non-missing values by the full
/// length of the column, missing entries included, while the whole-number
/// check only looks at non-missing values.
pub fn is_discrete(name: &str, values: &[Option<f64>], threshold: f64) -> Result<bool> {
    if values.is_empty() {
        return Err(Report::new(PlotError::EmptyColumn(name.to_string())));
    }

    let valid: Vec<f64> = values.iter().flatten().copied().filter(|v| !v.is_nan()).collect();
    let unique_ratio = distinct_count(&valid) as f64 / values.len() as f64;
    let all_whole = valid.iter().all(|v| v.fract() == 0.0);

    Ok(all_whole && unique_ratio < threshold)
}

/// Numeric column names split into discrete and continuous, table order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPartition {
    pub discrete: Vec<String>,
    pub continuous: Vec<String>,
}

impl ColumnPartition {
    pub fn is_discrete(&self, name: &str) -> bool {
        self.discrete.iter().any(|c| c == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.is_discrete(name) || self.continuous.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.discrete.len() + self.continuous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move a column into the discrete set. Already-discrete columns are left
    /// alone; names outside the partition are reported as not numeric.
    pub fn force_discrete(&mut self, name: &str) -> Result<()> {
        if self.is_discrete(name) {
            return Ok(());
        }
        let Some(pos) = self.continuous.iter().position(|c| c == name) else {
            return Err(Report::new(PlotError::NotNumeric(name.to_string())));
        };
        let col = self.continuous.remove(pos);
        self.discrete.push(col);
        Ok(())
    }
}

fn classify_column(column: &Column, threshold: f64) -> Result<Option<bool>> {
    match column.as_numeric() {
        Some(values) => is_discrete(&column.name, values, threshold).map(Some),
        None => Ok(None),
    }
}

/// Run the classifier once per numeric column of `table`.
pub fn partition_numeric(table: &Table, threshold: f64) -> Result<ColumnPartition> {
    let mut partition = ColumnPartition::default();
    for column in table.columns() {
        match classify_column(column, threshold)? {
            Some(true) => partition.discrete.push(column.name.clone()),
            Some(false) => partition.continuous.push(column.name.clone()),
            None => continue,
        }
        debug!(
            column = %column.name,
            discrete = partition.is_discrete(&column.name),
            "classified column"
        );
    }
    Ok(partition)
}
