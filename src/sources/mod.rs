//! Source collection providers
//!
//! Everything upstream of the row builders: parsing preference-pair records
//! from NDJSON/JSON exports, and loading the politeness CSV with its
//! column-name sniffing. Row builders receive already-resolved text/label
//! values, never raw heterogeneous records.

pub mod pairs;
pub mod requests;

pub use pairs::{PairAdapter, PreferencePair};
pub use requests::{RequestRecord, RequestTable, LABEL_COLUMN_CANDIDATES, TEXT_COLUMN_CANDIDATES};
