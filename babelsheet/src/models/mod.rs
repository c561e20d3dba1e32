//! Domain models for the babelsheet extraction pipeline.
//!
//! - [`CellValue`] - A single spreadsheet cell (text, number, boolean or absent)
//! - [`Grid`] - The rectangular block of cells read from a sheet
//! - [`HeaderLayout`] - Path depth and language columns found in the header row
//! - [`TranslationEntry`] - One localized value for one language
//! - [`FileSummary`] - What a writer produced

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Sentinels
// =============================================================================

/// First cell of the header row.
pub const HEADER_TAG: &str = "###";

/// Marks a path column in the header row.
pub const PATH_MARKER: &str = ">>>";

// =============================================================================
// Cells
// =============================================================================

/// Raw value of one spreadsheet cell.
///
/// `Absent` is not the same thing as an empty string: a blank cell in the
/// outline means "inherit from the row above".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    #[default]
    Absent,
}

impl CellValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Absent)
    }

    /// Returns true when the cell is the given literal string.
    pub fn is_text(&self, expected: &str) -> bool {
        matches!(self, CellValue::Text(s) if s == expected)
    }

    /// Text rendering of a present cell, `None` for absent cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Boolean(b) => Some(b.to_string()),
            CellValue::Absent => None,
        }
    }

    /// Text rendering where absent becomes the empty string.
    pub fn to_text_or_empty(&self) -> String {
        self.as_text().unwrap_or_default()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text_or_empty())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Absent)
    }
}

/// Integral numbers print without a fractional part (`3.0` -> `"3"`).
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// =============================================================================
// Grid
// =============================================================================

/// One spreadsheet row.
pub type Row = Vec<CellValue>;

/// Rectangular block of cells, fully loaded in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Row>,
    column_count: usize,
}

impl Grid {
    /// Build a grid from rows, padding short rows with `Absent` so that every
    /// row has the same width.
    pub fn new(rows: Vec<Row>) -> Self {
        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(column_count, CellValue::Absent);
                row
            })
            .collect();
        Self { rows, column_count }
    }

    /// Convenience constructor where `None` is an absent cell.
    pub fn from_optional_rows<S: AsRef<str>>(rows: &[Vec<Option<S>>]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| CellValue::from(cell.as_ref().map(|s| s.as_ref())))
                        .collect()
                })
                .collect(),
        )
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&CellValue::Absent)
    }
}

// =============================================================================
// Header layout
// =============================================================================

/// A language column found in the header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageColumn {
    pub language: String,
    pub column: usize,
}

/// Shape of the data rows, derived from the header row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderLayout {
    /// Number of `>>>` path columns after the tag column.
    pub path_depth: usize,
    /// Languages in header order.
    pub languages: Vec<LanguageColumn>,
}

impl HeaderLayout {
    pub fn language_names(&self) -> Vec<&str> {
        self.languages.iter().map(|l| l.language.as_str()).collect()
    }
}

// =============================================================================
// Entries and summaries
// =============================================================================

/// Key position of an entry, outer segment first.
pub type KeyPath = Vec<String>;

/// One localized value extracted from a data row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationEntry {
    pub language: String,
    pub path: KeyPath,
    /// First-column annotation of the source row.
    pub tag: CellValue,
    pub value: String,
}

impl TranslationEntry {
    /// Path segments joined with `separator`.
    pub fn joined_path(&self, separator: &str) -> String {
        self.path.join(separator)
    }
}

/// Result of writing one output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub file_path: String,
    pub entry_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_rendering() {
        assert_eq!(CellValue::Number(3.0).as_text().unwrap(), "3");
        assert_eq!(CellValue::Number(-12.0).as_text().unwrap(), "-12");
        assert_eq!(CellValue::Number(1.5).as_text().unwrap(), "1.5");
        assert_eq!(CellValue::Boolean(true).as_text().unwrap(), "true");
    }

    #[test]
    fn test_absent_is_not_empty_text() {
        assert!(CellValue::Absent.is_absent());
        assert!(!CellValue::from("").is_absent());
        assert_eq!(CellValue::Absent.as_text(), None);
        assert_eq!(CellValue::Absent.to_text_or_empty(), "");
    }

    #[test]
    fn test_grid_is_padded_to_rectangle() {
        let grid = Grid::new(vec![
            vec!["a".into()],
            vec!["b".into(), "c".into(), "d".into()],
        ]);

        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_count(), 3);
        assert_eq!(grid.rows()[0].len(), 3);
        assert!(grid.cell(0, 2).is_absent());
        assert!(grid.cell(9, 9).is_absent());
    }

    #[test]
    fn test_tag_serializes_untagged() {
        let entry = TranslationEntry {
            language: "en".into(),
            path: vec!["greeting".into()],
            tag: CellValue::from("t1"),
            value: "Hello".into(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["tag"], "t1");
        assert_eq!(json["path"][0], "greeting");
    }
}
