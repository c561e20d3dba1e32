//! Error types for the babelsheet pipeline.
//!
//! - [`SheetError`] - Reading the grid and locating the header
//! - [`WriteError`] - Producing one output file
//! - [`PipelineError`] - Top-level export orchestration
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::HEADER_TAG;

// =============================================================================
// Sheet Errors
// =============================================================================

/// Errors while reading a sheet into translation entries.
#[derive(Debug, Error)]
pub enum SheetError {
    /// No row starts with the header tag.
    #[error("No babelsheet header row found (first cell must be \"{}\")", HEADER_TAG)]
    MissingHeader,

    /// Failed to read the sheet.
    #[error("Failed to read sheet: {0}")]
    Io(#[from] std::io::Error),

    /// The sheet bytes could not be decoded.
    #[error("Failed to decode sheet: {0}")]
    Encoding(String),

    /// The grid source rejected the read.
    #[error("Invalid sheet source: {0}")]
    Source(String),
}

// =============================================================================
// Write Errors
// =============================================================================

/// Errors while writing one output file.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to create directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to open '{}' for writing: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to close '{}': {source}", .path.display())]
    Close {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Another group of the same export already targets this file.
    #[error("'{}' is already written by group '{owner}'", .path.display())]
    Collision { path: PathBuf, owner: String },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WriteError {
    /// Path of the file the error relates to, when known.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            WriteError::CreateDir { path, .. }
            | WriteError::Open { path, .. }
            | WriteError::Write { path, .. }
            | WriteError::Close { path, .. }
            | WriteError::Collision { path, .. } => Some(path),
            WriteError::Json(_) => None,
        }
    }
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level export errors.
///
/// Writer failures for individual files are reported per file in
/// [`crate::export::ExportReport`]; only failures that stop the whole run
/// end up here.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Sheet reading error.
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// Write error.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    /// Unusable configuration value.
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for sheet operations.
pub type SheetResult<T> = Result<T, SheetError>;

/// Result type for write operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
