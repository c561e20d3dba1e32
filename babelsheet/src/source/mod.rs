//! Grid sources.
//!
//! A [`GridSource`] is anything that can hand back a rectangular block of
//! cells. The pipeline reads the whole rectangle once with [`load_grid`]
//! before looking at a single row.
//!
//! - [`Grid`] itself, for data already in memory
//! - [`DelimitedSheet`] - a sheet exported as CSV/TSV

pub mod delimited;

pub use delimited::{
    decode_content, detect_delimiter, detect_encoding, DelimitedSheet, SourceOptions,
};

use crate::error::SheetResult;
use crate::models::{CellValue, Grid};

/// Supplier of spreadsheet cells.
pub trait GridSource {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    /// Value at `(row, column)`. Out-of-range reads are absent.
    fn cell_value(&self, row: usize, column: usize) -> SheetResult<CellValue>;
}

impl GridSource for Grid {
    fn row_count(&self) -> usize {
        Grid::row_count(self)
    }

    fn column_count(&self) -> usize {
        Grid::column_count(self)
    }

    fn cell_value(&self, row: usize, column: usize) -> SheetResult<CellValue> {
        Ok(self.cell(row, column).clone())
    }
}

/// Bulk read of `[0, 0)` to `(row_count, column_count)` into an owned grid.
pub fn load_grid<S: GridSource + ?Sized>(source: &S) -> SheetResult<Grid> {
    let (rows, columns) = (source.row_count(), source.column_count());

    let mut grid = Vec::with_capacity(rows);
    for y in 0..rows {
        let mut row = Vec::with_capacity(columns);
        for x in 0..columns {
            row.push(source.cell_value(y, x)?);
        }
        grid.push(row);
    }

    Ok(Grid::new(grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SheetError;

    struct FailingSource;

    impl GridSource for FailingSource {
        fn row_count(&self) -> usize {
            2
        }

        fn column_count(&self) -> usize {
            2
        }

        fn cell_value(&self, row: usize, _column: usize) -> SheetResult<CellValue> {
            if row == 1 {
                Err(SheetError::Source("quota exceeded".into()))
            } else {
                Ok(CellValue::from("x"))
            }
        }
    }

    #[test]
    fn test_load_grid_copies_every_cell() {
        let grid = Grid::from_optional_rows(&[
            vec![Some("###"), Some(">>>"), Some("en")],
            vec![None, Some("key"), Some("value")],
        ]);

        let loaded = load_grid(&grid).unwrap();
        assert_eq!(loaded, grid);
    }

    #[test]
    fn test_load_grid_propagates_source_errors() {
        let err = load_grid(&FailingSource).unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }
}
