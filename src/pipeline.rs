//! Pipeline orchestration
//!
//! End-to-end drivers for the two corpora, file in → feature table out:
//! parse source records, assemble rows through `DriftEngine`, persist, and
//! read back for summarization. Single-threaded, one full pass per run;
//! rows land in source iteration order.

use crate::error::DriftError;
use crate::features::DriftEngine;
use crate::metrics::{add_drift_index, read_feature_records, summarize, SummaryReport};
use crate::sources::pairs::PairAdapter;
use crate::sources::requests::RequestTable;
use crate::table::{write_table, TableFormat};
use std::fs;
use std::path::Path;

/// Input encoding for the preference-pair export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairInputFormat {
    /// One JSON record per line
    Ndjson,
    /// A single JSON array of records
    Json,
}

/// Build the preference-pair feature table from an export file and persist
/// it. Returns the number of rows written (two per source pair).
pub fn pairs_to_features(
    input: &Path,
    output: &Path,
    input_format: PairInputFormat,
    output_format: TableFormat,
    engine: &DriftEngine,
) -> Result<usize, DriftError> {
    if !input.exists() {
        return Err(DriftError::MissingInput(input.to_path_buf()));
    }
    let data = fs::read_to_string(input)?;

    let pairs = match input_format {
        PairInputFormat::Ndjson => PairAdapter::parse_ndjson(&data)?,
        PairInputFormat::Json => PairAdapter::parse_array(&data)?,
    };

    let rows = engine.build_pair_table(pairs);
    write_table(output, &rows, output_format)?;
    Ok(rows.len())
}

/// Build the politeness-request feature table from a CSV file and persist
/// it. Returns the number of rows written (one per source record).
///
/// Fails before any row is built when no text column can be resolved.
pub fn requests_to_features(
    input: &Path,
    output: &Path,
    output_format: TableFormat,
    engine: &DriftEngine,
) -> Result<usize, DriftError> {
    let table = RequestTable::from_csv_path(input)?;
    let records = table.resolve_records()?;

    let rows = engine.build_request_table(&records);
    write_table(output, &rows, output_format)?;
    Ok(rows.len())
}

/// Load a persisted feature table, derive the drift index, and summarize
pub fn summarize_features(input: &Path, format: TableFormat) -> Result<SummaryReport, DriftError> {
    let records = read_feature_records(input, format)?;
    let indexed = add_drift_index(records);
    Ok(summarize(&indexed))
}
