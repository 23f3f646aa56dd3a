//! Error types for the plotting pipeline

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    #[error("cannot classify empty column '{0}'")]
    EmptyColumn(String),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("column '{0}' is not categorical")]
    NotCategorical(String),

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("column '{column}' has {actual} rows, table has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("interval must lie strictly between 0 and 1, got {0}")]
    InvalidInterval(f64),

    #[error("zone {index} ends before it starts ({low} > {high})")]
    InvalidZone { index: usize, low: f64, high: f64 },

    #[error("failed to read CSV input")]
    Csv,

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, error_stack::Report<PlotError>>;
