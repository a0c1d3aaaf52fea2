//! Politeness-request source table
//!
//! Loads the request corpus from CSV and resolves which column holds the
//! request text and (optionally) which holds a politeness label, using a
//! ranked list of acceptable column names. Resolution failure for the text
//! column is a configuration error that aborts the run; a missing label
//! column just disables label passthrough.

use crate::error::DriftError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Accepted text column names, highest priority first
pub const TEXT_COLUMN_CANDIDATES: [&str; 5] =
    ["text", "Request", "request", "sentence", "utterance"];

/// Accepted label column names, highest priority first
pub const LABEL_COLUMN_CANDIDATES: [&str; 5] = ["label", "is_polite", "politeness", "Binary", "y"];

/// Cell values conventionally meaning "not available"
const NA_MARKERS: [&str; 7] = ["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// One resolved source record: the request text plus an optional label.
///
/// This is what the row builder consumes; column discovery has already
/// happened by the time a `RequestRecord` exists.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestRecord {
    pub text: String,
    pub label: Option<String>,
}

/// A politeness corpus loaded from CSV: header row plus string cells
#[derive(Debug, Clone)]
pub struct RequestTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RequestTable {
    /// Load a CSV file. The file must exist; a header row is required.
    pub fn from_csv_path(path: &Path) -> Result<Self, DriftError> {
        if !path.exists() {
            return Err(DriftError::MissingInput(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Load CSV from any reader
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DriftError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve the text and label columns, then materialize one
    /// `RequestRecord` per source row in order.
    ///
    /// Fails with a configuration error when no text-column candidate
    /// matches; NA cells coerce to empty text rather than propagating.
    pub fn resolve_records(&self) -> Result<Vec<RequestRecord>, DriftError> {
        let text_idx = resolve_column(&self.headers, &TEXT_COLUMN_CANDIDATES).ok_or_else(|| {
            DriftError::NoTextColumn {
                tried: TEXT_COLUMN_CANDIDATES.iter().map(|c| c.to_string()).collect(),
                found: self.headers.clone(),
            }
        })?;
        let label_idx = resolve_column(&self.headers, &LABEL_COLUMN_CANDIDATES);

        let records = self
            .rows
            .iter()
            .map(|row| RequestRecord {
                text: coerce_na(row.get(text_idx).map(String::as_str).unwrap_or("")),
                label: label_idx
                    .and_then(|i| row.get(i))
                    .filter(|l| !l.is_empty() && !NA_MARKERS.contains(&l.as_str()))
                    .map(|l| l.to_string()),
            })
            .collect();

        Ok(records)
    }
}

/// Linear priority match of candidate names against the header row.
///
/// Candidates are tried in ranked order; the first one present anywhere in
/// the headers wins. Comparison is exact (case-sensitive), matching the
/// candidate lists which already carry both spellings where needed.
pub fn resolve_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    for candidate in candidates {
        if let Some(idx) = headers.iter().position(|h| h == candidate) {
            return Some(idx);
        }
    }
    None
}

/// Coerce NA-marker cells to the empty string
fn coerce_na(cell: &str) -> String {
    if cell.is_empty() || NA_MARKERS.contains(&cell) {
        String::new()
    } else {
        cell.to_string()
    }
}
