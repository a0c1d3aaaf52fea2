//! Feature-table persistence
//!
//! Writes assembled feature tables durably and reads them back unchanged
//! for the metrics stage. Two formats:
//! - CSV: header row carrying the column names, one record per row
//! - NDJSON: one JSON object per row
//!
//! Both preserve column names and row order exactly.

use crate::error::DriftError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// On-disk table format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Ndjson,
}

impl TableFormat {
    /// Infer the format from a path's extension: `.csv` means CSV,
    /// anything else NDJSON.
    pub fn infer(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => TableFormat::Csv,
            _ => TableFormat::Ndjson,
        }
    }
}

/// Write a feature table to `path`, one record per row, in order
pub fn write_table<T: Serialize>(
    path: &Path,
    rows: &[T],
    format: TableFormat,
) -> Result<(), DriftError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_table_to(&mut writer, rows, format)?;
    writer.flush()?;
    Ok(())
}

/// Write a feature table to any writer
pub fn write_table_to<W: Write, T: Serialize>(
    writer: W,
    rows: &[T],
    format: TableFormat,
) -> Result<(), DriftError> {
    match format {
        TableFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for row in rows {
                csv_writer.serialize(row)?;
            }
            csv_writer.flush()?;
        }
        TableFormat::Ndjson => {
            let mut writer = writer;
            for row in rows {
                serde_json::to_writer(&mut writer, row)?;
                writer.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

/// Read a feature table back; rows come out in file order
pub fn read_table<T: DeserializeOwned>(
    path: &Path,
    format: TableFormat,
) -> Result<Vec<T>, DriftError> {
    if !path.exists() {
        return Err(DriftError::MissingInput(path.to_path_buf()));
    }
    let file = File::open(path)?;
    read_table_from(BufReader::new(file), format)
}

/// Read a feature table from any reader
pub fn read_table_from<R: Read, T: DeserializeOwned>(
    reader: R,
    format: TableFormat,
) -> Result<Vec<T>, DriftError> {
    match format {
        TableFormat::Csv => {
            let mut csv_reader = csv::Reader::from_reader(reader);
            let mut rows = Vec::new();
            for record in csv_reader.deserialize() {
                rows.push(record?);
            }
            Ok(rows)
        }
        TableFormat::Ndjson => {
            let mut data = String::new();
            let mut reader = reader;
            reader.read_to_string(&mut data)?;

            let mut rows = Vec::new();
            for line in data.lines() {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rows.push(serde_json::from_str(trimmed)?);
            }
            Ok(rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{DriftEngine, PairFeatureRow, RequestFeatureRow};
    use crate::sources::pairs::PreferencePair;
    use crate::sources::requests::RequestRecord;
    use pretty_assertions::assert_eq;

    fn sample_pair_rows() -> Vec<PairFeatureRow> {
        let engine = DriftEngine::new();
        engine.build_pair_table(vec![
            PreferencePair {
                prompt: "How are you?".to_string(),
                chosen: "I feel really relieved, thank you".to_string(),
                rejected: "no.".to_string(),
            },
            PreferencePair {
                prompt: "Commas, \"quotes\" and\nnewlines".to_string(),
                chosen: "maybe".to_string(),
                rejected: String::new(),
            },
        ])
    }

    fn sample_request_rows() -> Vec<RequestFeatureRow> {
        let engine = DriftEngine::new();
        let records = vec![
            RequestRecord {
                text: "Could you maybe help? Thanks".to_string(),
                label: Some("1".to_string()),
            },
            RequestRecord {
                text: String::new(),
                label: None,
            },
        ];
        engine.build_request_table(&records)
    }

    #[test]
    fn test_format_inference() {
        assert_eq!(TableFormat::infer(Path::new("out.csv")), TableFormat::Csv);
        assert_eq!(TableFormat::infer(Path::new("out.CSV")), TableFormat::Csv);
        assert_eq!(TableFormat::infer(Path::new("out.ndjson")), TableFormat::Ndjson);
        assert_eq!(TableFormat::infer(Path::new("out")), TableFormat::Ndjson);
    }

    #[test]
    fn test_csv_round_trip_preserves_rows_and_order() {
        let rows = sample_pair_rows();
        let mut buf = Vec::new();
        write_table_to(&mut buf, &rows, TableFormat::Csv).unwrap();

        let loaded: Vec<PairFeatureRow> =
            read_table_from(buf.as_slice(), TableFormat::Csv).unwrap();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn test_ndjson_round_trip_preserves_rows_and_order() {
        let rows = sample_request_rows();
        let mut buf = Vec::new();
        write_table_to(&mut buf, &rows, TableFormat::Ndjson).unwrap();

        let loaded: Vec<RequestFeatureRow> =
            read_table_from(buf.as_slice(), TableFormat::Ndjson).unwrap();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn test_csv_header_carries_column_names() {
        let rows = sample_request_rows();
        let mut buf = Vec::new();
        write_table_to(&mut buf, &rows, TableFormat::Csv).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "row_id,h1_emotion,h2_relational,h3_hedging,h4_anthro,h5_softeners,h_total,politeness_label"
        );
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.csv");

        let rows = sample_pair_rows();
        write_table(&path, &rows, TableFormat::Csv).unwrap();
        let loaded: Vec<PairFeatureRow> = read_table(&path, TableFormat::Csv).unwrap();

        assert_eq!(loaded, rows);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err =
            read_table::<PairFeatureRow>(Path::new("/nonexistent/t.csv"), TableFormat::Csv)
                .unwrap_err();
        assert!(matches!(err, DriftError::MissingInput(_)));
    }
}
