//! Feature rows and row building
//!
//! Turns heterogeneous source records into uniform feature rows:
//! - `HClassFeatures` is the shared block every row embeds (five class
//!   counts plus their materialized total)
//! - `PairFeatureRow` / `RequestFeatureRow` are the two output schemas
//! - `DriftEngine` holds the lexicon and assembles whole tables
//!
//! Both dataset variants delegate counting and total computation to the same
//! `HClassFeatures::compute`, so the total/count consistency invariant holds
//! structurally for every row.

use crate::counter::{count_h_tokens, HClassCounts};
use crate::lexicon::HClassLexicon;
use crate::sources::pairs::PreferencePair;
use crate::sources::requests::RequestRecord;
use serde::{Deserialize, Serialize};

/// Variant label for the two halves of a preference pair
pub const LABEL_CHOSEN: &str = "chosen";
pub const LABEL_REJECTED: &str = "rejected";

/// Shared per-text feature block: class counts plus total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HClassFeatures {
    pub counts: HClassCounts,
    pub h_total: u32,
}

impl HClassFeatures {
    /// Compute the feature block for one piece of text.
    ///
    /// This is the only place `h_total` is materialized.
    pub fn compute(text: &str, lexicon: &HClassLexicon) -> Self {
        let counts = count_h_tokens(text, lexicon);
        Self {
            counts,
            h_total: counts.total(),
        }
    }
}

/// One output row of the preference-pair feature table.
///
/// Each source pair yields two rows sharing one `pair_id`, one per response
/// variant; counts are computed on the response text, never the prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairFeatureRow {
    pub pair_id: u64,
    pub prompt: String,
    pub response: String,
    pub label: String,
    pub h1_emotion: u32,
    pub h2_relational: u32,
    pub h3_hedging: u32,
    pub h4_anthro: u32,
    pub h5_softeners: u32,
    pub h_total: u32,
}

impl PairFeatureRow {
    fn new(pair_id: u64, prompt: &str, response: &str, label: &str, features: HClassFeatures) -> Self {
        Self {
            pair_id,
            prompt: prompt.to_string(),
            response: response.to_string(),
            label: label.to_string(),
            h1_emotion: features.counts.h1_emotion,
            h2_relational: features.counts.h2_relational,
            h3_hedging: features.counts.h3_hedging,
            h4_anthro: features.counts.h4_anthro,
            h5_softeners: features.counts.h5_softeners,
            h_total: features.h_total,
        }
    }
}

/// One output row of the politeness-request feature table.
///
/// Text-free by design: the row carries the counts and the optional label,
/// keyed by the source record's positional index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestFeatureRow {
    pub row_id: u64,
    pub h1_emotion: u32,
    pub h2_relational: u32,
    pub h3_hedging: u32,
    pub h4_anthro: u32,
    pub h5_softeners: u32,
    pub h_total: u32,
    pub politeness_label: Option<String>,
}

impl RequestFeatureRow {
    fn new(row_id: u64, label: Option<&str>, features: HClassFeatures) -> Self {
        Self {
            row_id,
            h1_emotion: features.counts.h1_emotion,
            h2_relational: features.counts.h2_relational,
            h3_hedging: features.counts.h3_hedging,
            h4_anthro: features.counts.h4_anthro,
            h5_softeners: features.counts.h5_softeners,
            h_total: features.h_total,
            politeness_label: label.map(|l| l.to_string()),
        }
    }
}

/// Row builder and table assembler over a held lexicon.
///
/// Stateless apart from the lexicon value; safe to reuse across tables.
#[derive(Debug, Clone, Default)]
pub struct DriftEngine {
    lexicon: HClassLexicon,
}

impl DriftEngine {
    /// Engine with the default lexicon
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a caller-supplied lexicon
    pub fn with_lexicon(lexicon: HClassLexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &HClassLexicon {
        &self.lexicon
    }

    /// Build the two rows for one preference pair: chosen first, rejected
    /// second, both keyed by `pair_id`.
    pub fn pair_rows(&self, pair_id: u64, pair: &PreferencePair) -> [PairFeatureRow; 2] {
        let chosen = HClassFeatures::compute(&pair.chosen, &self.lexicon);
        let rejected = HClassFeatures::compute(&pair.rejected, &self.lexicon);
        [
            PairFeatureRow::new(pair_id, &pair.prompt, &pair.chosen, LABEL_CHOSEN, chosen),
            PairFeatureRow::new(pair_id, &pair.prompt, &pair.rejected, LABEL_REJECTED, rejected),
        ]
    }

    /// Build the single row for one politeness request
    pub fn request_row(&self, row_id: u64, record: &RequestRecord) -> RequestFeatureRow {
        let features = HClassFeatures::compute(&record.text, &self.lexicon);
        RequestFeatureRow::new(row_id, record.label.as_deref(), features)
    }

    /// Assemble the full preference-pair feature table in source order.
    ///
    /// Every source record contributes exactly two rows; no filtering, no
    /// reordering.
    pub fn build_pair_table<I>(&self, pairs: I) -> Vec<PairFeatureRow>
    where
        I: IntoIterator<Item = PreferencePair>,
    {
        let mut rows = Vec::new();
        for (pair_id, pair) in pairs.into_iter().enumerate() {
            rows.extend(self.pair_rows(pair_id as u64, &pair));
        }
        rows
    }

    /// Assemble the full request feature table in source order.
    ///
    /// Exactly one row per record, even for empty text (all-zero counts).
    pub fn build_request_table<'a, I>(&self, records: I) -> Vec<RequestFeatureRow>
    where
        I: IntoIterator<Item = &'a RequestRecord>,
    {
        records
            .into_iter()
            .enumerate()
            .map(|(row_id, record)| self.request_row(row_id as u64, record))
            .collect()
    }
}
