//! Preference-pair source records
//!
//! Parses dialogue preference pairs (prompt + chosen/rejected responses)
//! from an NDJSON or JSON-array export. A missing or null field is treated
//! as an empty string, never an error.

use crate::error::DriftError;
use serde::{Deserialize, Deserializer, Serialize};

/// One preference-pair record: a prompt and two tagged response variants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferencePair {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub prompt: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub chosen: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rejected: String,
}

/// Deserialize a possibly-null string field as an empty string
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parsing entry points for preference-pair exports
pub struct PairAdapter;

impl PairAdapter {
    /// Parse newline-delimited JSON (one pair per line, blank lines skipped)
    pub fn parse_ndjson(data: &str) -> Result<Vec<PreferencePair>, DriftError> {
        let mut pairs = Vec::new();
        for (line_no, line) in data.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let pair: PreferencePair = serde_json::from_str(trimmed).map_err(|e| {
                DriftError::ParseError(format!("line {}: {}", line_no + 1, e))
            })?;
            pairs.push(pair);
        }
        Ok(pairs)
    }

    /// Parse a JSON array of pair records
    pub fn parse_array(data: &str) -> Result<Vec<PreferencePair>, DriftError> {
        serde_json::from_str(data)
            .map_err(|e| DriftError::ParseError(format!("pair array: {}", e)))
    }
}
