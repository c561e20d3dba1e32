//! Sheets exported as delimited text (CSV, TSV, ...).
//!
//! Encoding and delimiter are auto-detected unless given explicitly.
//! Empty cells are read as absent, everything else as text.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::GridSource;
use crate::error::{SheetError, SheetResult};
use crate::models::{CellValue, Grid};

/// How to read a delimited sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceOptions {
    /// Explicit delimiter (auto-detect if not set)
    pub delimiter: Option<char>,
}

/// A delimited sheet loaded in memory.
#[derive(Debug, Clone)]
pub struct DelimitedSheet {
    grid: Grid,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
}

impl DelimitedSheet {
    /// Read a sheet file with the given options.
    pub fn open<P: AsRef<Path>>(path: P, options: &SourceOptions) -> SheetResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes, options)
    }

    /// Parse raw bytes with encoding and (optional) delimiter detection.
    pub fn from_bytes(bytes: &[u8], options: &SourceOptions) -> SheetResult<Self> {
        let encoding = detect_encoding(bytes);
        let content = decode_content(bytes, &encoding)?;
        let delimiter = options.delimiter.unwrap_or_else(|| detect_delimiter(&content));

        let grid = parse_grid(&content, delimiter)?;

        Ok(Self {
            grid,
            encoding,
            delimiter,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

impl GridSource for DelimitedSheet {
    fn row_count(&self) -> usize {
        self.grid.row_count()
    }

    fn column_count(&self) -> usize {
        self.grid.column_count()
    }

    fn cell_value(&self, row: usize, column: usize) -> SheetResult<CellValue> {
        Ok(self.grid.cell(row, column).clone())
    }
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> SheetResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).into_owned(),
        // WHATWG maps the latin-1 labels to windows-1252
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        other => {
            let codec = encoding_rs::Encoding::for_label(other.as_bytes())
                .ok_or_else(|| SheetError::Encoding(format!("Unsupported encoding '{}'", other)))?;
            codec.decode(bytes).0.into_owned()
        }
    };

    // Spreadsheet exports often carry a BOM
    Ok(decoded.trim_start_matches('\u{feff}').to_string())
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse delimited text into a rectangular grid.
pub fn parse_grid(content: &str, delimiter: char) -> SheetResult<Grid> {
    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| SheetError::Source(format!("Delimiter '{}' is not ASCII", delimiter)))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (line_idx, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| SheetError::Source(format!("Line {}: {}", line_idx + 1, e)))?;

        let row = record
            .iter()
            .map(|cell| {
                if cell.is_empty() {
                    CellValue::Absent
                } else {
                    CellValue::Text(cell.to_string())
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(Grid::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cells_are_absent() {
        let grid = parse_grid("###,>>>,en\n,greeting,Hello\n", ',').unwrap();

        assert_eq!(grid.row_count(), 2);
        assert!(grid.cell(1, 0).is_absent());
        assert!(grid.cell(1, 1).is_text("greeting"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let grid = parse_grid("###,>>>,en,fr\n,greeting\n", ',').unwrap();

        assert_eq!(grid.column_count(), 4);
        assert!(grid.cell(1, 3).is_absent());
    }

    #[test]
    fn test_quoted_cells_keep_delimiters_and_newlines() {
        let grid = parse_grid("a,\"b, c\",\"line1\nline2\"\n", ',').unwrap();

        assert!(grid.cell(0, 1).is_text("b, c"));
        assert!(grid.cell(0, 2).is_text("line1\nline2"));
    }

    #[test]
    fn test_detect_delimiter_comma() {
        assert_eq!(detect_delimiter("###,>>>,en,fr\n"), ',');
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        assert_eq!(detect_delimiter("###;>>>;en;fr\n"), ';');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("###\t>>>\ten\n"), '\t');
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        assert!(parse_grid("a§b", '§').is_err());
    }

    #[test]
    fn test_bom_is_stripped() {
        let bytes = "\u{feff}###,>>>,en\n".as_bytes();
        let sheet = DelimitedSheet::from_bytes(bytes, &SourceOptions::default()).unwrap();

        assert!(sheet.grid().cell(0, 0).is_text("###"));
        assert_eq!(sheet.delimiter, ',');
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");

        // 0xA4 is the currency sign in latin-1, the euro sign only in latin-9
        assert_eq!(decode_content(&[0xA4], "iso-8859-1").unwrap(), "¤");
        assert_eq!(decode_content(&[0xA4], "iso-8859-15").unwrap(), "€");
    }

    #[test]
    fn test_explicit_delimiter_wins() {
        let options = SourceOptions { delimiter: Some(';') };
        let sheet = DelimitedSheet::from_bytes(b"a;b,c\n", &options).unwrap();

        assert_eq!(sheet.delimiter, ';');
        assert!(sheet.grid().cell(0, 1).is_text("b,c"));
    }
}
