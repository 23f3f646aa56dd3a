//! CSV input with per-column dtype inference.
//!
//! A column is numeric when every non-missing field parses as `f64`;
//! otherwise it is categorical. Fields equal to one of the null markers
//! (after trimming) are missing.

use std::io::Read;
use std::path::Path;

use error_stack::ResultExt;
use tracing::debug;

use crate::error::{PlotError, Result};
use crate::table::{Column, Table};

/// Null markers recognized by default.
pub const DEFAULT_NULL_MARKERS: &[&str] = &[
    "", "NA", "N/A", "na", "n/a", "null", "NULL", "None", "none", "NaN", "nan",
];

#[derive(Debug, Clone)]
pub struct CsvReader {
    delimiter: u8,
    null_markers: Vec<String>,
    title: Option<String>,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvReader {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            null_markers: DEFAULT_NULL_MARKERS.iter().map(|s| s.to_string()).collect(),
            title: None,
        }
    }

    pub fn delimiter(mut self, delim: u8) -> Self {
        self.delimiter = delim;
        self
    }

    pub fn null_markers(mut self, markers: Vec<String>) -> Self {
        self.null_markers = markers;
        self
    }

    /// Title attached to the loaded table.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn read_path(&self, path: &Path) -> Result<Table> {
        let file = std::fs::File::open(path)
            .change_context(PlotError::Csv)
            .attach(format!("cannot open {}", path.display()))?;
        self.read(file).attach(format!("input: {}", path.display()))
    }

    pub fn read_str(&self, input: &str) -> Result<Table> {
        self.read(input.as_bytes())
    }

    pub fn read<R: Read>(&self, reader: R) -> Result<Table> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .change_context(PlotError::Csv)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for (line, record) in rdr.records().enumerate() {
            let record = record
                .change_context(PlotError::Csv)
                .attach(format!("record {}", line + 1))?;
            for (i, field) in record.iter().enumerate().take(headers.len()) {
                raw[i].push(self.field(field));
            }
            // Short rows are padded with missing values.
            for col in raw.iter_mut().skip(record.len()) {
                col.push(None);
            }
        }

        let mut table = Table::new();
        table.set_title(self.title.clone());
        for (name, values) in headers.into_iter().zip(raw) {
            let column = infer_column(name, values);
            debug!(column = %column.name, numeric = column.is_numeric(), "loaded column");
            table.add_column(column)?;
        }
        Ok(table)
    }

    fn field(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if self.null_markers.iter().any(|m| m == trimmed) {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

fn infer_column(name: String, values: Vec<Option<String>>) -> Column {
    // A header with no data under it carries no evidence of a numeric type.
    if values.is_empty() {
        return Column::categorical(name, values);
    }
    let parsed: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|v| match v {
            Some(s) => s.parse::<f64>().ok().map(Some),
            None => Some(None),
        })
        .collect();

    match parsed {
        Some(numbers) => Column::numeric(name, numbers),
        None => Column::categorical(name, values),
    }
}

/// Load a CSV file with the default reader settings.
pub fn read_csv(path: &Path) -> Result<Table> {
    CsvReader::new().read_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnData;
    use std::io::Write;

    #[test]
    fn infers_numeric_and_categorical() {
        let table = CsvReader::new()
            .read_str("age,city,score\n30,Paris,1.5\n41,Rome,NA\n,Paris,2\n")
            .unwrap();

        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_count(), 3);
        assert_eq!(
            table.column("age").unwrap().data,
            ColumnData::Numeric(vec![Some(30.0), Some(41.0), None])
        );
        assert!(!table.column("city").unwrap().is_numeric());
        assert_eq!(
            table.column("score").unwrap().as_numeric().unwrap(),
            &[Some(1.5), None, Some(2.0)]
        );
    }

    #[test]
    fn one_text_value_makes_column_categorical() {
        let table = CsvReader::new().read_str("x\n1\n2\nthree\n").unwrap();
        let col = table.column("x").unwrap();
        assert_eq!(
            col.as_categorical().unwrap(),
            &[Some("1".into()), Some("2".into()), Some("three".into())]
        );
    }

    #[test]
    fn quoted_fields_and_custom_delimiter() {
        let table = CsvReader::new()
            .delimiter(b';')
            .read_str("name;value\n\"Smith; J\";3\n")
            .unwrap();
        assert_eq!(
            table.column("name").unwrap().as_categorical().unwrap(),
            &[Some("Smith; J".into())]
        );
    }

    #[test]
    fn title_is_attached() {
        let table = CsvReader::new().title("survey").read_str("a\n1\n").unwrap();
        assert_eq!(table.title(), Some("survey"));
        let untitled = CsvReader::new().read_str("a\n1\n").unwrap();
        assert_eq!(untitled.title(), None);
    }

    #[test]
    fn reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a,b\n1,x\n2,y").unwrap();
        let table = read_csv(file.path()).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn missing_file_is_a_csv_error() {
        let err = read_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.current_context(), &PlotError::Csv);
    }

    #[test]
    fn empty_input_has_no_columns() {
        let table = CsvReader::new().read_str("").unwrap();
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn header_only_columns_are_categorical() {
        let table = CsvReader::new().read_str("a,b\n").unwrap();
        assert_eq!(table.column_count(), 2);
        assert!(table.columns().iter().all(|c| !c.is_numeric() && c.is_empty()));
    }
}
