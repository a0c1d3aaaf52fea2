//! h-drift - Lexical drift feature engine
//!
//! Computes counts of phrases from five semantic classes ("H-classes":
//! emotion, relational, hedging, anthropomorphic self-reference, softeners)
//! over free-text corpora, assembles them into uniform feature tables, and
//! derives a per-row drift index with summary statistics.
//!
//! Pipeline: lexicon → counter → row builder → table assembly →
//! (persisted table) → drift index & summary.
//!
//! ## Modules
//!
//! - **Pair driver**: preference-pair dialogue records, two rows per pair
//! - **Request driver**: politeness requests from CSV, one row per record

pub mod counter;
pub mod error;
pub mod features;
pub mod lexicon;
pub mod metrics;
pub mod pipeline;
pub mod sources;
pub mod table;

pub use counter::{count_h_tokens, HClassCounts};
pub use error::DriftError;
pub use features::{DriftEngine, HClassFeatures, PairFeatureRow, RequestFeatureRow};
pub use lexicon::{HClass, HClassLexicon};
pub use metrics::{add_drift_index, summarize, SummaryReport};
pub use pipeline::{pairs_to_features, requests_to_features, summarize_features};
pub use table::{read_table, write_table, TableFormat};

/// h-drift version embedded in summary reports
pub const HDRIFT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for summary reports
pub const PRODUCER_NAME: &str = "h-drift";
