//! Drift index and summary statistics
//!
//! Loads a persisted feature table down to the metrics schema (five count
//! columns, `h_total`, optional label), derives the per-row drift index,
//! and computes descriptive statistics — overall and grouped by label when
//! one is present. No filtering, imputation, or outlier handling: the stats
//! cover exactly the rows present.

use crate::error::DriftError;
use crate::table::{read_table, TableFormat};
use crate::{HDRIFT_VERSION, PRODUCER_NAME};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Count column names, in table order
pub const COUNT_COLUMNS: [&str; 5] = [
    "h1_emotion",
    "h2_relational",
    "h3_hedging",
    "h4_anthro",
    "h5_softeners",
];

/// Name of the derived index column
pub const DRIFT_INDEX_COLUMN: &str = "drift_index";

// Raw read-back schema: every count field optional so that an absent column
// surfaces as a named schema error instead of a serde message.
#[derive(Debug, Deserialize)]
struct RawFeatureRecord {
    #[serde(default)]
    h1_emotion: Option<u32>,
    #[serde(default)]
    h2_relational: Option<u32>,
    #[serde(default)]
    h3_hedging: Option<u32>,
    #[serde(default)]
    h4_anthro: Option<u32>,
    #[serde(default)]
    h5_softeners: Option<u32>,
    #[serde(default)]
    h_total: Option<u32>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    politeness_label: Option<String>,
}

/// One feature-table row at the metrics stage.
///
/// Either dataset variant loads into this shape; columns the metrics stage
/// does not use (prompt, response, ids) are ignored on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub h1_emotion: u32,
    pub h2_relational: u32,
    pub h3_hedging: u32,
    pub h4_anthro: u32,
    pub h5_softeners: u32,
    pub h_total: u32,
    pub label: Option<String>,
    pub politeness_label: Option<String>,
}

impl FeatureRecord {
    /// The grouping key: the pair label if present, else the politeness label
    pub fn group_label(&self) -> Option<&str> {
        self.label.as_deref().or(self.politeness_label.as_deref())
    }
}

/// A feature record with its derived drift index column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftRecord {
    pub h1_emotion: u32,
    pub h2_relational: u32,
    pub h3_hedging: u32,
    pub h4_anthro: u32,
    pub h5_softeners: u32,
    pub h_total: u32,
    pub drift_index: f64,
    pub label: Option<String>,
    pub politeness_label: Option<String>,
}

impl DriftRecord {
    pub fn group_label(&self) -> Option<&str> {
        self.label.as_deref().or(self.politeness_label.as_deref())
    }
}

/// Read a persisted feature table down to the metrics schema.
///
/// Fails with `MissingColumn` when a count column or `h_total` is absent
/// from the table.
pub fn read_feature_records(
    path: &Path,
    format: TableFormat,
) -> Result<Vec<FeatureRecord>, DriftError> {
    let raw: Vec<RawFeatureRecord> = read_table(path, format)?;
    raw.into_iter().map(validate_record).collect()
}

fn validate_record(raw: RawFeatureRecord) -> Result<FeatureRecord, DriftError> {
    let require = |value: Option<u32>, column: &str| {
        value.ok_or_else(|| DriftError::MissingColumn(column.to_string()))
    };
    Ok(FeatureRecord {
        h1_emotion: require(raw.h1_emotion, "h1_emotion")?,
        h2_relational: require(raw.h2_relational, "h2_relational")?,
        h3_hedging: require(raw.h3_hedging, "h3_hedging")?,
        h4_anthro: require(raw.h4_anthro, "h4_anthro")?,
        h5_softeners: require(raw.h5_softeners, "h5_softeners")?,
        h_total: require(raw.h_total, "h_total")?,
        label: raw.label,
        politeness_label: raw.politeness_label,
    })
}

/// Append the drift index column: for v1 the index is the row's `h_total`
/// reinterpreted as a float. Later versions may normalize or combine it
/// with other features.
pub fn add_drift_index(records: Vec<FeatureRecord>) -> Vec<DriftRecord> {
    records
        .into_iter()
        .map(|r| DriftRecord {
            h1_emotion: r.h1_emotion,
            h2_relational: r.h2_relational,
            h3_hedging: r.h3_hedging,
            h4_anthro: r.h4_anthro,
            h5_softeners: r.h5_softeners,
            h_total: r.h_total,
            drift_index: r.h_total as f64,
            label: r.label,
            politeness_label: r.politeness_label,
        })
        .collect()
}

/// Descriptive statistics for one column of values.
///
/// Matches the conventional describe() semantics: sample standard deviation
/// (n-1 denominator, `None` below two values) and linear-interpolation
/// quartiles. All stats are `None` for an empty column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Describe {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Compute descriptive statistics over a column of values
pub fn describe(values: &[f64]) -> Describe {
    let count = values.len();
    if count == 0 {
        return Describe {
            count: 0,
            mean: None,
            std: None,
            min: None,
            q25: None,
            median: None,
            q75: None,
            max: None,
        };
    }

    let mean = values.iter().sum::<f64>() / count as f64;

    let std = if count > 1 {
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        Some((sum_sq / (count - 1) as f64).sqrt())
    } else {
        None
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Describe {
        count,
        mean: Some(mean),
        std,
        min: Some(sorted[0]),
        q25: Some(quantile(&sorted, 0.25)),
        median: Some(quantile(&sorted, 0.5)),
        q75: Some(quantile(&sorted, 0.75)),
        max: Some(sorted[count - 1]),
    }
}

/// Linear-interpolation quantile over already-sorted values
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
    }
}

/// Report producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Statistics for one named column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub stats: Describe,
}

/// Drift-index statistics for one label value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelSummary {
    pub label: String,
    pub stats: Describe,
}

/// The full summary report: per-column stats plus optional per-label groups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub producer: ReportProducer,
    pub computed_at_utc: DateTime<Utc>,
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
    pub by_label: Option<Vec<LabelSummary>>,
}

/// Summarize a drift-indexed table.
///
/// Produces describe() stats for the five count columns and the drift
/// index; when any row carries a label, adds drift-index stats grouped by
/// distinct label value, groups ordered by first appearance. Rows without
/// a label are left out of the grouped section only.
pub fn summarize(records: &[DriftRecord]) -> SummaryReport {
    let mut columns = Vec::with_capacity(COUNT_COLUMNS.len() + 1);

    let column_values: [(&str, Vec<f64>); 6] = [
        (
            COUNT_COLUMNS[0],
            records.iter().map(|r| r.h1_emotion as f64).collect(),
        ),
        (
            COUNT_COLUMNS[1],
            records.iter().map(|r| r.h2_relational as f64).collect(),
        ),
        (
            COUNT_COLUMNS[2],
            records.iter().map(|r| r.h3_hedging as f64).collect(),
        ),
        (
            COUNT_COLUMNS[3],
            records.iter().map(|r| r.h4_anthro as f64).collect(),
        ),
        (
            COUNT_COLUMNS[4],
            records.iter().map(|r| r.h5_softeners as f64).collect(),
        ),
        (
            DRIFT_INDEX_COLUMN,
            records.iter().map(|r| r.drift_index).collect(),
        ),
    ];

    for (column, values) in column_values {
        columns.push(ColumnSummary {
            column: column.to_string(),
            stats: describe(&values),
        });
    }

    let by_label = group_by_label(records);

    SummaryReport {
        producer: ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: HDRIFT_VERSION.to_string(),
            instance_id: Uuid::new_v4().to_string(),
        },
        computed_at_utc: Utc::now(),
        rows: records.len(),
        columns,
        by_label,
    }
}

/// Drift-index stats per distinct label, in first-appearance order
fn group_by_label(records: &[DriftRecord]) -> Option<Vec<LabelSummary>> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: Vec<Vec<f64>> = Vec::new();

    for record in records {
        let Some(label) = record.group_label() else {
            continue;
        };
        match order.iter().position(|l| l == label) {
            Some(idx) => groups[idx].push(record.drift_index),
            None => {
                order.push(label.to_string());
                groups.push(vec![record.drift_index]);
            }
        }
    }

    if order.is_empty() {
        return None;
    }

    Some(
        order
            .into_iter()
            .zip(groups)
            .map(|(label, values)| LabelSummary {
                label,
                stats: describe(&values),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{read_table_from, write_table_to};
    use pretty_assertions::assert_eq;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn make_record(h1: u32, total: u32, label: Option<&str>) -> FeatureRecord {
        FeatureRecord {
            h1_emotion: h1,
            h2_relational: 0,
            h3_hedging: 0,
            h4_anthro: 0,
            h5_softeners: 0,
            h_total: total,
            label: label.map(|l| l.to_string()),
            politeness_label: None,
        }
    }

    #[test]
    fn test_drift_index_identity() {
        let records = vec![make_record(1, 3, None), make_record(0, 0, None)];
        let indexed = add_drift_index(records);

        assert!(close(indexed[0].drift_index, 3.0));
        assert!(close(indexed[1].drift_index, 0.0));
        for r in &indexed {
            assert!(close(r.drift_index, r.h_total as f64));
        }
    }

    #[test]
    fn test_describe_hand_computed() {
        let stats = describe(&[0.0, 1.0, 2.0, 3.0, 4.0]);

        assert_eq!(stats.count, 5);
        assert!(close(stats.mean.unwrap(), 2.0));
        // sample std: sqrt(10 / 4)
        assert!(close(stats.std.unwrap(), 2.5f64.sqrt()));
        assert!(close(stats.min.unwrap(), 0.0));
        assert!(close(stats.q25.unwrap(), 1.0));
        assert!(close(stats.median.unwrap(), 2.0));
        assert!(close(stats.q75.unwrap(), 3.0));
        assert!(close(stats.max.unwrap(), 4.0));
    }

    #[test]
    fn test_describe_interpolated_quartiles() {
        let stats = describe(&[1.0, 2.0, 3.0, 4.0]);

        assert!(close(stats.q25.unwrap(), 1.75));
        assert!(close(stats.median.unwrap(), 2.5));
        assert!(close(stats.q75.unwrap(), 3.25));
    }

    #[test]
    fn test_describe_degenerate_inputs() {
        let empty = describe(&[]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.mean, None);
        assert_eq!(empty.max, None);

        let single = describe(&[5.0]);
        assert_eq!(single.count, 1);
        assert!(close(single.mean.unwrap(), 5.0));
        assert_eq!(single.std, None);
        assert!(close(single.median.unwrap(), 5.0));
    }

    #[test]
    fn test_summarize_columns_and_groups() {
        let records = add_drift_index(vec![
            make_record(2, 4, Some("chosen")),
            make_record(0, 0, Some("rejected")),
            make_record(1, 2, Some("chosen")),
            make_record(0, 1, Some("rejected")),
        ]);
        let report = summarize(&records);

        assert_eq!(report.rows, 4);
        assert_eq!(report.columns.len(), 6);
        assert_eq!(report.columns[0].column, "h1_emotion");
        assert_eq!(report.columns[5].column, "drift_index");
        assert!(close(report.columns[5].stats.mean.unwrap(), 1.75));

        let groups = report.by_label.unwrap();
        assert_eq!(groups.len(), 2);
        // First-appearance order
        assert_eq!(groups[0].label, "chosen");
        assert_eq!(groups[1].label, "rejected");
        assert_eq!(groups[0].stats.count, 2);
        assert!(close(groups[0].stats.mean.unwrap(), 3.0));
        assert!(close(groups[1].stats.mean.unwrap(), 0.5));
    }

    #[test]
    fn test_summarize_without_labels_has_no_groups() {
        let records = add_drift_index(vec![make_record(1, 1, None), make_record(2, 2, None)]);
        let report = summarize(&records);
        assert!(report.by_label.is_none());
    }

    #[test]
    fn test_politeness_label_used_for_grouping() {
        let mut record = make_record(1, 1, None);
        record.politeness_label = Some("1".to_string());
        let report = summarize(&add_drift_index(vec![record]));

        let groups = report.by_label.unwrap();
        assert_eq!(groups[0].label, "1");
    }

    #[test]
    fn test_missing_total_column_is_schema_error() {
        // A table lacking h_total must fail loudly at the metrics stage
        let csv_data = "h1_emotion,h2_relational,h3_hedging,h4_anthro,h5_softeners\n1,0,0,0,0\n";
        let raw: Vec<RawFeatureRecord> =
            read_table_from(csv_data.as_bytes(), TableFormat::Csv).unwrap();
        let err = raw
            .into_iter()
            .map(validate_record)
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err();

        match err {
            DriftError::MissingColumn(column) => assert_eq!(column, "h_total"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_read_back_pair_table_ignores_text_columns() {
        use crate::features::DriftEngine;
        use crate::sources::pairs::PreferencePair;

        let engine = DriftEngine::new();
        let rows = engine.build_pair_table(vec![PreferencePair {
            prompt: "p".to_string(),
            chosen: "I feel really relieved, thank you".to_string(),
            rejected: "no.".to_string(),
        }]);

        let mut buf = Vec::new();
        write_table_to(&mut buf, &rows, TableFormat::Csv).unwrap();
        let raw: Vec<RawFeatureRecord> =
            read_table_from(buf.as_slice(), TableFormat::Csv).unwrap();
        let records: Vec<FeatureRecord> = raw
            .into_iter()
            .map(validate_record)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label.as_deref(), Some("chosen"));
        assert_eq!(records[0].h_total, rows[0].h_total);
    }
}
