//! High-level export API: sheet in, one file per group out.
//!
//! # Example
//!
//! ```rust,ignore
//! use babelsheet::export::{export_source, ExportOptions, Layout};
//! use babelsheet::source::{DelimitedSheet, SourceOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sheet = DelimitedSheet::open("translations.csv", &SourceOptions::default())?;
//!     let options = ExportOptions { layout: Layout::Flat, ..ExportOptions::default() };
//!
//!     let report = export_source(&sheet, &options).await?;
//!     println!("Wrote {} files", report.written().count());
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use futures::future::join_all;

use super::group::{by_language, group_by, Group};
use crate::error::{PipelineError, PipelineResult, WriteError};
use crate::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::models::{FileSummary, Grid, HeaderLayout};
use crate::sheet::{read_entries, read_source, SheetEntries};
use crate::source::GridSource;
use crate::write::{
    CsvRecord, CsvWriter, EntryWriter, FlatEntry, JsonFlatWriter, JsonTreeWriter, TreeEntry,
};

/// Column holding the joined key in CSV output
pub const CSV_KEY_COLUMN: &str = "translationKey";

/// Column holding the translated value in CSV output
pub const CSV_VALUE_COLUMN: &str = "value";

/// How entries are grouped into files and which writer produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// `{out}/{lang}.csv` with `translationKey,value` rows
    Csv,
    /// `{out}/{lang}.json` with joined keys
    Flat,
    /// `{out}/{lang}.json` with nested objects
    #[default]
    Tree,
    /// `{out}/{lang}/{section}.json`, one file per first path segment
    Sections,
}

impl Layout {
    pub const ALL: [Layout; 4] = [Layout::Csv, Layout::Flat, Layout::Tree, Layout::Sections];

    pub fn name(&self) -> &'static str {
        match self {
            Layout::Csv => "csv",
            Layout::Flat => "flat",
            Layout::Tree => "tree",
            Layout::Sections => "sections",
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            Layout::Csv => "csv",
            _ => "json",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layout::ALL
            .into_iter()
            .find(|layout| layout.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                PipelineError::InvalidOption(format!(
                    "Unknown layout '{}' (expected one of: csv, flat, tree, sections)",
                    s
                ))
            })
    }
}

/// Options for the export pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Root directory for generated files
    pub output_dir: PathBuf,

    pub layout: Layout,

    /// Joins path segments into flat keys (`csv` and `flat` layouts)
    pub key_separator: String,

    /// Delimiter for the `csv` layout
    pub csv_delimiter: char,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("i18n"),
            layout: Layout::default(),
            key_separator: ".".to_string(),
            csv_delimiter: ',',
        }
    }
}

impl ExportOptions {
    /// Defaults overridden by `BABELSHEET_*` environment variables
    /// (a `.env` file is loaded first if present).
    pub fn from_env() -> PipelineResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> PipelineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(dir) = lookup("BABELSHEET_OUTPUT_DIR") {
            options.output_dir = PathBuf::from(dir);
        }
        if let Some(layout) = lookup("BABELSHEET_LAYOUT") {
            options.layout = layout.parse()?;
        }
        if let Some(separator) = lookup("BABELSHEET_KEY_SEPARATOR") {
            options.key_separator = separator;
        }
        if let Some(delimiter) = lookup("BABELSHEET_CSV_DELIMITER") {
            options.csv_delimiter = parse_delimiter(&delimiter)?;
        }

        options.validate()?;
        Ok(options)
    }

    /// Reject settings that would produce unreadable output.
    pub fn validate(&self) -> PipelineResult<()> {
        if matches!(self.csv_delimiter, '"' | '\n' | '\r') {
            return Err(PipelineError::InvalidOption(format!(
                "CSV delimiter cannot be {:?}",
                self.csv_delimiter
            )));
        }
        Ok(())
    }
}

/// Parse a delimiter given as a single character or `\t`/`tab`.
pub fn parse_delimiter(value: &str) -> PipelineResult<char> {
    match value {
        "\\t" | "tab" | "TAB" => return Ok('\t'),
        _ => {}
    }

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(PipelineError::InvalidOption(format!(
            "Delimiter must be a single character, got '{}'",
            value
        ))),
    }
}

/// Outcome of one writer
#[derive(Debug)]
pub struct FileOutcome {
    /// Grouping key (`en`, `en/home`, ...)
    pub group: String,
    pub result: Result<FileSummary, WriteError>,
}

/// Result of a complete export run
#[derive(Debug)]
pub struct ExportReport {
    pub layout: HeaderLayout,

    /// Entries extracted from the sheet
    pub entry_count: usize,

    /// Entries left out because the layout had no file for them
    pub skipped_count: usize,

    /// One outcome per group, in group order
    pub files: Vec<FileOutcome>,
}

impl ExportReport {
    pub fn written(&self) -> impl Iterator<Item = &FileSummary> {
        self.files.iter().filter_map(|f| f.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &WriteError)> {
        self.files
            .iter()
            .filter_map(|f| f.result.as_ref().err().map(|e| (f.group.as_str(), e)))
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Read a grid source and export it.
///
/// The whole grid is loaded and parsed before any file is touched, so a
/// sheet without header writes nothing.
pub async fn export_source<S: GridSource + ?Sized>(
    source: &S,
    options: &ExportOptions,
) -> PipelineResult<ExportReport> {
    options.validate()?;

    log_info("📖 Reading sheet...");
    let sheet = read_source(source)?;
    Ok(export_entries(sheet, options).await)
}

/// Export an in-memory grid.
pub async fn export_grid(grid: &Grid, options: &ExportOptions) -> PipelineResult<ExportReport> {
    options.validate()?;

    let sheet = read_entries(grid)?;
    Ok(export_entries(sheet, options).await)
}

/// Group extracted entries and run one writer per group.
///
/// Writers run concurrently. A failing writer is reported in its
/// [`FileOutcome`] and does not affect the others.
pub async fn export_entries(sheet: SheetEntries, options: &ExportOptions) -> ExportReport {
    let SheetEntries {
        layout,
        row_count,
        blank_rows,
        entries,
    } = sheet;

    log_success(format!(
        "Header: {} path level(s), languages [{}]",
        layout.path_depth,
        layout.language_names().join(", ")
    ));
    log_success(format!(
        "{} data rows ({} without values), {} entries",
        row_count,
        blank_rows,
        entries.len()
    ));

    let entry_count = entries.len();
    let dir = options.output_dir.as_path();
    let separator = options.key_separator.as_str();

    log_info(format!(
        "📦 Writing {} layout to {}",
        options.layout,
        dir.display()
    ));

    let (files, grouped_count) = match options.layout {
        Layout::Csv => {
            let groups = by_language(entries, |entry| {
                CsvRecord::from([
                    (CSV_KEY_COLUMN.to_string(), entry.joined_path(separator)),
                    (CSV_VALUE_COLUMN.to_string(), entry.value),
                ])
            });
            let count = item_count(&groups);
            let columns = vec![CSV_KEY_COLUMN.to_string(), CSV_VALUE_COLUMN.to_string()];
            let jobs = groups.into_iter().map(|group| {
                let writer = CsvWriter::new(group_file(dir, &group.key, Layout::Csv), columns.clone())
                    .with_delimiter(options.csv_delimiter);
                (group.key, writer, group.items)
            });
            (run_writers(jobs).await, count)
        }
        Layout::Flat => {
            let groups = by_language(entries, |entry| FlatEntry {
                key: entry.joined_path(separator),
                value: entry.value,
            });
            let count = item_count(&groups);
            let jobs = groups.into_iter().map(|group| {
                let writer = JsonFlatWriter::new(group_file(dir, &group.key, Layout::Flat));
                (group.key, writer, group.items)
            });
            (run_writers(jobs).await, count)
        }
        Layout::Tree => {
            let groups = by_language(entries, |entry| TreeEntry {
                path: entry.path,
                value: entry.value,
            });
            let count = item_count(&groups);
            let jobs = groups.into_iter().map(|group| {
                let writer = JsonTreeWriter::new(group_file(dir, &group.key, Layout::Tree));
                (group.key, writer, group.items)
            });
            (run_writers(jobs).await, count)
        }
        Layout::Sections => {
            let groups = group_by(
                entries,
                |entry| {
                    entry
                        .path
                        .first()
                        .map(|section| format!("{}/{}", entry.language, section))
                },
                |entry| TreeEntry {
                    path: entry.path[1..].to_vec(),
                    value: entry.value,
                },
            );
            let count = item_count(&groups);
            let jobs = groups.into_iter().map(|group| {
                let writer = JsonTreeWriter::new(group_file(dir, &group.key, Layout::Sections));
                (group.key, writer, group.items)
            });
            (run_writers(jobs).await, count)
        }
    };

    let skipped_count = entry_count - grouped_count;
    if skipped_count > 0 {
        log_warning(format!(
            "{} entries without a section were not written",
            skipped_count
        ));
    }

    let report = ExportReport {
        layout,
        entry_count,
        skipped_count,
        files,
    };

    let failed = report.failures().count();
    if failed == 0 {
        log_success(format!("✨ {} file(s) written", report.files.len()));
    } else {
        log_error(format!(
            "{} of {} file(s) failed",
            failed,
            report.files.len()
        ));
    }

    report
}

fn item_count<V>(groups: &[Group<V>]) -> usize {
    groups.iter().map(|g| g.items.len()).sum()
}

/// Drive every writer to completion, each on its own future.
async fn run_writers<W, J>(jobs: J) -> Vec<FileOutcome>
where
    W: EntryWriter,
    J: IntoIterator<Item = (String, W, Vec<W::Entry>)>,
{
    // Sanitized keys can land on the same file; only the first group keeps it
    let mut owners: HashMap<PathBuf, String> = HashMap::new();
    let jobs: Vec<_> = jobs
        .into_iter()
        .map(|(group, writer, entries)| {
            let path = writer.file_path().to_path_buf();
            let owner = match owners.get(&path) {
                Some(owner) => Some(owner.clone()),
                None => {
                    owners.insert(path, group.clone());
                    None
                }
            };
            (group, writer, entries, owner)
        })
        .collect();

    let writes = jobs.into_iter().map(|(group, writer, entries, owner)| async move {
        let result = match owner {
            Some(owner) => Err(WriteError::Collision {
                path: writer.file_path().to_path_buf(),
                owner,
            }),
            None => writer.write(entries).await,
        };
        match &result {
            Ok(summary) => log_info_indent(
                format!(
                    "Wrote file: \"{}\" with {} entries",
                    summary.file_path, summary.entry_count
                ),
                1,
            ),
            Err(e) => log_error(format!(
                "{} ({}): {}",
                group,
                writer.file_path().display(),
                e
            )),
        }
        FileOutcome { group, result }
    });

    join_all(writes).await
}

/// File for a group key. Each `/`-separated part of the key becomes one
/// path component; parts that are not plain names are neutralized.
pub fn group_file(dir: &Path, group_key: &str, layout: Layout) -> PathBuf {
    let mut path = dir.to_path_buf();
    let parts: Vec<String> = group_key.split('/').map(safe_component).collect();

    if let Some((file, parents)) = parts.split_last() {
        for parent in parents {
            path.push(parent);
        }
        path.push(format!("{}.{}", file, layout.extension()));
    }

    path
}

fn safe_component(part: &str) -> String {
    let cleaned: String = part
        .chars()
        .map(|c| if matches!(c, '\\' | '\0' | ':') { '_' } else { c })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => cleaned.replace('.', "_") + "_",
        _ => cleaned,
    }
}
