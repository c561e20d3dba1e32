//! CSV output.
//!
//! Rows are streamed to the file one chunk per entry, so a failure halfway
//! leaves the rows written so far on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::file::write_chunks;
use super::EntryWriter;
use crate::error::WriteResult;
use crate::models::FileSummary;

/// One CSV row, keyed by column name.
pub type CsvRecord = HashMap<String, String>;

/// Writes records under a fixed column order.
#[derive(Debug, Clone)]
pub struct CsvWriter {
    file_path: PathBuf,
    columns: Vec<String>,
    delimiter: char,
}

impl CsvWriter {
    pub fn new(file_path: impl Into<PathBuf>, columns: Vec<String>) -> Self {
        Self {
            file_path: file_path.into(),
            columns,
            delimiter: ',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Header line with the column names.
    pub fn header_row(&self) -> String {
        csv_row(&self.columns, self.delimiter)
    }

    /// Record values in column order. Missing columns are empty.
    pub fn record_row(&self, record: &CsvRecord) -> String {
        let values: Vec<&str> = self
            .columns
            .iter()
            .map(|column| record.get(column).map(String::as_str).unwrap_or(""))
            .collect();
        csv_row(&values, self.delimiter)
    }
}

impl EntryWriter for CsvWriter {
    type Entry = CsvRecord;

    fn file_path(&self) -> &Path {
        &self.file_path
    }

    async fn write<I>(&self, entries: I) -> WriteResult<FileSummary>
    where
        I: IntoIterator<Item = Self::Entry>,
    {
        let chunks = std::iter::once(self.header_row())
            .chain(entries.into_iter().map(|record| self.record_row(&record)));

        let summary = write_chunks(&self.file_path, chunks).await?;

        // Header row is not an entry
        Ok(FileSummary {
            entry_count: summary.entry_count.saturating_sub(1),
            ..summary
        })
    }
}

/// Join escaped values with `delimiter` and terminate with `\n`.
pub fn csv_row<S: AsRef<str>>(values: &[S], delimiter: char) -> String {
    let mut line = values
        .iter()
        .map(|value| escape_value(value.as_ref(), delimiter))
        .collect::<Vec<_>>()
        .join(&delimiter.to_string());
    line.push('\n');
    line
}

/// Quote a value containing the delimiter, a double quote or a newline,
/// doubling inner quotes. Anything else is emitted verbatim.
pub fn escape_value(value: &str, delimiter: char) -> String {
    let must_quote = value.contains(delimiter) || value.contains('"') || value.contains('\n');

    if !must_quote {
        return value.to_string();
    }

    format!("\"{}\"", value.replace('"', "\"\""))
}
