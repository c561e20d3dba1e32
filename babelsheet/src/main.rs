//! Babelsheet CLI - Export spreadsheet translations to i18n files
//!
//! # Commands
//!
//! ```bash
//! babelsheet export sheet.csv                  # Nested JSON per language in ./i18n
//! babelsheet export sheet.csv -l csv -o out    # CSV per language in ./out
//! babelsheet export sheet.csv --log-file log.json  # Keep the export log as JSON
//! babelsheet entries sheet.csv                 # Dump extracted entries as JSON
//! babelsheet header sheet.csv                  # Show detected path depth and languages
//! babelsheet layouts                           # List output layouts
//! ```
//!
//! `BABELSHEET_OUTPUT_DIR`, `BABELSHEET_LAYOUT`, `BABELSHEET_KEY_SEPARATOR`
//! and `BABELSHEET_CSV_DELIMITER` (also read from `.env`) set the defaults
//! that flags override.

use babelsheet::export::parse_delimiter;
use babelsheet::logs::{drain, LOG_BROADCASTER};
use babelsheet::{
    export_source, read_source, DelimitedSheet, ExportOptions, Layout, SourceOptions,
};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "babelsheet")]
#[command(about = "Export babelsheet spreadsheets to JSON and CSV translation files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one file per language (or per language and section)
    Export {
        /// Sheet exported as CSV/TSV
        sheet: PathBuf,

        /// Sheet delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output layout: csv, flat, tree, sections
        #[arg(short, long)]
        layout: Option<String>,

        /// Separator used to join key segments (csv and flat layouts)
        #[arg(long)]
        separator: Option<String>,

        /// Delimiter of generated CSV files (`tab` for tabs)
        #[arg(long)]
        csv_delimiter: Option<String>,

        /// Also save the export log as JSON
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Print the extracted translation entries as JSON
    Entries {
        /// Sheet exported as CSV/TSV
        sheet: PathBuf,

        /// Sheet delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the header layout detected in a sheet
    Header {
        /// Sheet exported as CSV/TSV
        sheet: PathBuf,

        /// Sheet delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,
    },

    /// List available output layouts
    Layouts,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export {
            sheet,
            delimiter,
            output,
            layout,
            separator,
            csv_delimiter,
            log_file,
        } => {
            cmd_export(
                &sheet,
                delimiter,
                output,
                layout.as_deref(),
                separator,
                csv_delimiter.as_deref(),
                log_file.as_deref(),
            )
            .await
        }

        Commands::Entries {
            sheet,
            delimiter,
            output,
        } => cmd_entries(&sheet, delimiter, output.as_deref()),

        Commands::Header { sheet, delimiter } => cmd_header(&sheet, delimiter),

        Commands::Layouts => cmd_layouts(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn open_sheet(path: &Path, delimiter: Option<char>) -> Result<DelimitedSheet, Box<dyn std::error::Error>> {
    eprintln!("📄 Sheet: {}", path.display());

    let sheet = DelimitedSheet::open(path, &SourceOptions { delimiter })?;

    eprintln!("   Encoding: {}", sheet.encoding);
    eprintln!(
        "   Delimiter: '{}'{}",
        format_delimiter(sheet.delimiter),
        if delimiter.is_none() { " (auto-detected)" } else { "" }
    );

    Ok(sheet)
}

async fn cmd_export(
    sheet_path: &Path,
    delimiter: Option<char>,
    output: Option<PathBuf>,
    layout: Option<&str>,
    separator: Option<String>,
    csv_delimiter: Option<&str>,
    log_file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = ExportOptions::from_env()?;
    if let Some(dir) = output {
        options.output_dir = dir;
    }
    if let Some(layout) = layout {
        options.layout = layout.parse()?;
    }
    if let Some(separator) = separator {
        options.key_separator = separator;
    }
    if let Some(csv_delimiter) = csv_delimiter {
        options.csv_delimiter = parse_delimiter(csv_delimiter)?;
    }

    let sheet = open_sheet(sheet_path, delimiter)?;

    let mut log_rx = LOG_BROADCASTER.subscribe();
    let outcome = export_source(&sheet, &options).await;
    if let Some(path) = log_file {
        let entries = drain(&mut log_rx);
        write_output(&serde_json::to_string_pretty(&entries)?, Some(path))?;
    }
    let report = outcome?;

    let failed = report.failures().count();
    if failed > 0 {
        return Err(format!("{} of {} file(s) could not be written", failed, report.files.len()).into());
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_entries(
    sheet_path: &Path,
    delimiter: Option<char>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let sheet = open_sheet(sheet_path, delimiter)?;
    let result = read_source(&sheet)?;

    eprintln!("✅ Extracted {} entries", result.entries.len());

    let json = serde_json::to_string_pretty(&result.entries)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_header(sheet_path: &Path, delimiter: Option<char>) -> Result<(), Box<dyn std::error::Error>> {
    let sheet = open_sheet(sheet_path, delimiter)?;
    let result = read_source(&sheet)?;

    println!("Path depth: {}", result.layout.path_depth);
    println!("Languages:");
    for language in &result.layout.languages {
        println!("  [{:2}] {}", language.column + 1, language.language);
    }
    println!("Data rows: {} ({} without values)", result.row_count, result.blank_rows);

    Ok(())
}

fn cmd_layouts() -> Result<(), Box<dyn std::error::Error>> {
    for layout in Layout::ALL {
        let description = match layout {
            Layout::Csv => "{out}/{lang}.csv with translationKey,value rows",
            Layout::Flat => "{out}/{lang}.json with joined keys",
            Layout::Tree => "{out}/{lang}.json with nested objects",
            Layout::Sections => "{out}/{lang}/{section}.json, nested, one file per top-level key",
        };
        println!("  {:<9} {}", layout.name(), description);
    }
    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
