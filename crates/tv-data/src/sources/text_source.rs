//! Delimited text ingestion
//!
//! The first non-blank line holds the header names, every following line one
//! row of comma-separated values. There is no quoting: a comma always
//! separates fields. Tokens are trimmed. Rows may be shorter or longer than
//! the header; absent trailing cells are treated as missing downstream and
//! surplus cells are ignored.

use std::path::Path;
use csv::{ReaderBuilder, Trim};

use crate::DataError;

/// Header plus raw rows, before any typing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Cell `col` of `row`, `None` if the row is too short
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Text source for one in-memory table
pub struct TextSource {
    name: String,
    text: String,
}

impl TextSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Read a whole file into a source named after the file
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.csv")
            .to_string();
        Ok(Self::new(name, text))
    }

    pub fn source_name(&self) -> &str {
        &self.name
    }

    /// Split the text into header and rows.
    ///
    /// Fails with [`DataError::EmptyInput`] when there is no header line.
    pub fn read_table(&self) -> Result<RawTable, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(self.text.as_bytes());

        let mut records = reader.records();

        let headers: Vec<String> = match records.next() {
            Some(header) => header?.iter().map(str::to_string).collect(),
            None => return Err(DataError::EmptyInput),
        };

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        tracing::debug!(
            "Read {} columns and {} rows from {}",
            headers.len(),
            rows.len(),
            self.name
        );

        Ok(RawTable { headers, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_and_rows_are_trimmed() {
        let source = TextSource::new("inline", "time , temp\n 2024-01-01 , 1.5 \n2024-01-02,2\n");
        let table = source.read_table().unwrap();

        assert_eq!(table.headers, vec!["time", "temp"]);
        assert_eq!(table.rows, vec![vec!["2024-01-01", "1.5"], vec!["2024-01-02", "2"]]);
    }

    #[test]
    fn test_short_rows_are_kept() {
        let source = TextSource::new("inline", "time,a,b\n2024-01-01,1\n");
        let table = source.read_table().unwrap();

        assert_eq!(table.cell(0, 1), Some("1"));
        assert_eq!(table.cell(0, 2), None);
    }

    #[test]
    fn test_quotes_are_not_special() {
        let source = TextSource::new("inline", "time,label\n2024-01-01,\"a\n");
        let table = source.read_table().unwrap();
        assert_eq!(table.cell(0, 1), Some("\"a"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let source = TextSource::new("inline", "time,v\r\n2024-01-01,1\r\n");
        let table = source.read_table().unwrap();
        assert_eq!(table.headers, vec!["time", "v"]);
        assert_eq!(table.cell(0, 1), Some("1"));
    }

    #[test]
    fn test_empty_input_fails() {
        let result = TextSource::new("empty", "").read_table();
        assert!(matches!(result, Err(DataError::EmptyInput)));
    }

    #[test]
    fn test_header_only() {
        let table = TextSource::new("inline", "time,v\n").read_table().unwrap();
        assert_eq!(table.row_count(), 0);
    }
}
