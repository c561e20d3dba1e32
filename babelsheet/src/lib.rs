//! # Babelsheet - spreadsheet translations to i18n files
//!
//! Babelsheet reads a spreadsheet laid out as an indented outline of keys,
//! one column per language, and writes the translations out as nested JSON,
//! flat JSON or CSV files grouped by language.
//!
//! ## Sheet format
//!
//! ```text
//! ┌─────┬────────┬──────────┬───────────┬────────────┐
//! │ ### │ >>>    │ >>>      │ en        │ fr         │  header row
//! ├─────┼────────┼──────────┼───────────┼────────────┤
//! │     │ home   │          │           │            │  section row
//! │ t1  │        │ title    │ Welcome   │ Bienvenue  │  -> home.title
//! │     │        │ subtitle │ Hi        │ Salut      │  -> home.subtitle
//! └─────┴────────┴──────────┴───────────┴────────────┘
//! ```
//!
//! A blank path cell means "same as the row above".
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ GridSource  │────▶│   Sheet     │────▶│   Export    │────▶│   Writers   │
//! │ (CSV, mem)  │     │ (header +   │     │ (group per  │     │ (JSON tree, │
//! │             │     │  path fold) │     │  language)  │     │  flat, CSV) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use babelsheet::{export_source, DelimitedSheet, ExportOptions, SourceOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sheet = DelimitedSheet::open("translations.csv", &SourceOptions::default()).unwrap();
//!     let report = export_source(&sheet, &ExportOptions::default()).await.unwrap();
//!     println!("Wrote {} files", report.written().count());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Cells, grid, entries
//! - [`source`] - Grid sources
//! - [`sheet`] - Header detection, path reconstruction, entry expansion
//! - [`write`] - CSV and JSON writers
//! - [`export`] - Grouping and the export pipeline
//! - [`logs`] - Log broadcasting

// Core modules
pub mod error;
pub mod models;

// Input
pub mod source;
pub mod sheet;

// Output
pub mod write;
pub mod export;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{PipelineError, PipelineResult, SheetError, SheetResult, WriteError, WriteResult};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    CellValue,
    FileSummary,
    Grid,
    HeaderLayout,
    KeyPath,
    LanguageColumn,
    Row,
    TranslationEntry,
};

// =============================================================================
// Re-exports - Sources
// =============================================================================

pub use source::{load_grid, DelimitedSheet, GridSource, SourceOptions};

// =============================================================================
// Re-exports - Sheet reading
// =============================================================================

pub use sheet::{
    parse_header,
    read_entries,
    read_source,
    reconstruct_paths,
    ParsedSheet,
    PathReconstructor,
    PathState,
    SheetEntries,
};

// =============================================================================
// Re-exports - Writers
// =============================================================================

pub use write::{
    write_chunks,
    CsvRecord,
    CsvWriter,
    EntryWriter,
    FlatEntry,
    JsonFlatWriter,
    JsonTreeWriter,
    TreeEntry,
};

// =============================================================================
// Re-exports - Export pipeline
// =============================================================================

pub use export::{
    export_entries,
    export_grid,
    export_source,
    ExportOptions,
    ExportReport,
    FileOutcome,
    Layout,
};
