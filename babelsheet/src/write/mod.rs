//! Output writers.
//!
//! Every writer consumes the ordered entries of one group and produces one
//! file plus a [`FileSummary`]. They all go through [`write_chunks`], which
//! owns directory creation, ordering and closing.
//!
//! | Writer             | Accumulation        | Chunks              |
//! |--------------------|---------------------|---------------------|
//! | [`CsvWriter`]      | none, streams rows  | header + one per row |
//! | [`JsonFlatWriter`] | `key -> value` map  | one                 |
//! | [`JsonTreeWriter`] | nested objects      | one                 |

pub mod csv;
pub mod file;
pub mod json;

pub use self::csv::{csv_row, escape_value, CsvRecord, CsvWriter};
pub use file::write_chunks;
pub use json::{set_path, FlatEntry, JsonFlatWriter, JsonTreeWriter, TreeEntry};

use std::path::Path;

use crate::error::WriteResult;
use crate::models::FileSummary;

/// Writes an ordered sequence of entries to one file.
#[allow(async_fn_in_trait)]
pub trait EntryWriter {
    type Entry;

    /// Target file.
    fn file_path(&self) -> &Path;

    /// Consume `entries` in order and write the file.
    async fn write<I>(&self, entries: I) -> WriteResult<FileSummary>
    where
        I: IntoIterator<Item = Self::Entry>;
}
