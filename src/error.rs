//! Error types for h-drift

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or summarizing feature tables
#[derive(Debug, Error)]
pub enum DriftError {
    #[error("Required input file not found: {0}")]
    MissingInput(PathBuf),

    #[error("Could not find a text column; tried {tried:?}, table has {found:?}")]
    NoTextColumn {
        tried: Vec<String>,
        found: Vec<String>,
    },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Failed to parse source record: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
