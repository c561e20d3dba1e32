//! Babelsheet reading: header detection, path reconstruction and entry
//! expansion.
//!
//! ```text
//! Grid ──▶ parse_header ──▶ PathReconstructor ──▶ expand_row ──▶ entries
//!          (once)           (left fold)           (per language)
//! ```

pub mod entries;
pub mod header;
pub mod path;

pub use entries::{expand_row, is_blank_row};
pub use header::{header_layout, parse_header, ParsedSheet};
pub use path::{path_segments, reconstruct_paths, PathReconstructor, PathState};

use crate::error::SheetResult;
use crate::models::{Grid, HeaderLayout, TranslationEntry};
use crate::source::{load_grid, GridSource};

/// Entries extracted from one sheet, with the layout they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetEntries {
    pub layout: HeaderLayout,
    /// Data rows seen after the header (spacers excluded)
    pub row_count: usize,
    /// Rows that produced no entries
    pub blank_rows: usize,
    pub entries: Vec<TranslationEntry>,
}

/// Extract every translation entry from a grid, in row then language order.
pub fn read_entries(grid: &Grid) -> SheetResult<SheetEntries> {
    let ParsedSheet { layout, data_rows } = parse_header(grid)?;

    let mut entries = Vec::with_capacity(data_rows.len() * layout.languages.len());
    let mut blank_rows = 0;

    for (row, path) in PathReconstructor::new(data_rows.iter(), layout.path_depth) {
        let expanded = expand_row(row, &path, &layout);
        if expanded.is_empty() {
            blank_rows += 1;
        }
        entries.extend(expanded);
    }

    Ok(SheetEntries {
        layout,
        row_count: data_rows.len(),
        blank_rows,
        entries,
    })
}

/// Load the whole grid from a source, then extract its entries.
pub fn read_source<S: GridSource + ?Sized>(source: &S) -> SheetResult<SheetEntries> {
    let grid = load_grid(source)?;
    read_entries(&grid)
}
