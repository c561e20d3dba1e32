//! Header row detection.

use crate::error::{SheetError, SheetResult};
use crate::models::{CellValue, Grid, HeaderLayout, LanguageColumn, Row, HEADER_TAG, PATH_MARKER};

/// Data rows that follow the header, plus the layout the header describes.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSheet {
    pub layout: HeaderLayout,
    /// Rows after the header, spacer rows removed, source order kept.
    pub data_rows: Vec<Row>,
}

/// Locate the header row and split the grid into layout and data rows.
///
/// When several rows start with `###` the last one is the header; rows
/// above it are ignored.
pub fn parse_header(grid: &Grid) -> SheetResult<ParsedSheet> {
    let header_index = grid
        .rows()
        .iter()
        .rposition(|row| row.first().is_some_and(|cell| cell.is_text(HEADER_TAG)))
        .ok_or(SheetError::MissingHeader)?;

    let header = &grid.rows()[header_index];
    let layout = header_layout(header);

    let data_rows = grid.rows()[header_index + 1..]
        .iter()
        .filter(|row| !is_spacer(row))
        .cloned()
        .collect();

    Ok(ParsedSheet { layout, data_rows })
}

/// Read path depth and language columns from a header row.
///
/// Languages are read positionally: the n-th non-empty language cell maps
/// to column `path_depth + 1 + n`, whatever column its label sits in.
pub fn header_layout(header: &[CellValue]) -> HeaderLayout {
    let path_depth = header
        .iter()
        .skip(1)
        .filter(|cell| cell.is_text(PATH_MARKER))
        .count();

    let languages = header
        .iter()
        .skip(path_depth + 1)
        .filter_map(CellValue::as_text)
        .enumerate()
        .map(|(index, language)| LanguageColumn {
            language,
            column: path_depth + 1 + index,
        })
        .collect();

    HeaderLayout {
        path_depth,
        languages,
    }
}

fn is_spacer(row: &Row) -> bool {
    row.iter().all(|cell| cell.is_absent())
}
