//! In-memory table of named columns.
//!
//! A [`Table`] holds numeric and categorical columns of equal length in
//! insertion order. Missing entries are `None`; a `NaN` stored in a numeric
//! column is treated as missing by every consumer.

use crate::error::{PlotError, Result};
use error_stack::Report;

/// Column storage, split by dtype.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    /// Numeric column without missing entries.
    pub fn dense(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::numeric(name, values.into_iter().map(Some).collect())
    }

    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.data, ColumnData::Numeric(_))
    }

    /// Raw numeric values, `None` for categorical columns.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Categorical(_) => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Categorical(v) => Some(v),
            ColumnData::Numeric(_) => None,
        }
    }

    /// Non-missing numeric values in row order.
    pub fn valid_numbers(&self) -> Vec<f64> {
        self.as_numeric()
            .map(|v| v.iter().flatten().copied().filter(|x| !x.is_nan()).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    title: Option<String>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// Best-effort title lookup; `None` means the table carries no title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Append a column. Names must be unique and lengths must agree with
    /// the columns already present.
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        if self.column(&column.name).is_some() {
            return Err(Report::new(PlotError::DuplicateColumn(column.name)));
        }
        let expected = self.row_count();
        if !self.columns.is_empty() && expected != column.len() {
            return Err(Report::new(PlotError::LengthMismatch {
                actual: column.len(),
                column: column.name,
                expected,
            }));
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn with_column(mut self, column: Column) -> Result<Self> {
        self.add_column(column)?;
        Ok(self)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Look up a column, failing with `ColumnNotFound`.
    pub fn require(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| Report::new(PlotError::ColumnNotFound(name.to_string())))
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    pub fn categorical_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.is_numeric())
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_columns_come_in_insertion_order() {
        let table = Table::new()
            .with_column(Column::dense("a", vec![1.0, 2.0]))
            .and_then(|t| {
                t.with_column(Column::categorical(
                    "b",
                    vec![Some("x".into()), None],
                ))
            })
            .and_then(|t| t.with_column(Column::dense("c", vec![3.0, 4.0])))
            .unwrap();

        let numeric: Vec<_> = table.numeric_columns().map(|c| c.name.as_str()).collect();
        let categorical: Vec<_> = table
            .categorical_columns()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(numeric, ["a", "c"]);
        assert_eq!(categorical, ["b"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut table = Table::new();
        table.add_column(Column::dense("a", vec![1.0])).unwrap();
        let err = table.add_column(Column::dense("a", vec![2.0])).unwrap_err();
        assert_eq!(
            err.current_context(),
            &PlotError::DuplicateColumn("a".into())
        );
    }

    #[test]
    fn rejects_length_mismatch() {
        let mut table = Table::new();
        table.add_column(Column::dense("a", vec![1.0, 2.0])).unwrap();
        let err = table.add_column(Column::dense("b", vec![1.0])).unwrap_err();
        assert!(matches!(
            err.current_context(),
            PlotError::LengthMismatch { expected: 2, actual: 1, .. }
        ));
    }

    #[test]
    fn title_defaults_to_none() {
        assert_eq!(Table::new().title(), None);
        assert_eq!(Table::new().with_title("sales").title(), Some("sales"));
    }

    #[test]
    fn valid_numbers_skip_missing_and_nan() {
        let col = Column::numeric("x", vec![Some(1.0), None, Some(f64::NAN), Some(3.0)]);
        assert_eq!(col.valid_numbers(), vec![1.0, 3.0]);
    }

    #[test]
    fn require_reports_missing_column() {
        let err = Table::new().require("nope").unwrap_err();
        assert_eq!(
            err.current_context(),
            &PlotError::ColumnNotFound("nope".into())
        );
    }
}
