//! Feed normalization for the tickfeed pipeline.
//!
//! This crate handles:
//! - Tolerant per-line parsing of the CSV and JSON wire formats
//! - Bad-record routing for malformed or unclassifiable lines
//! - Unification of the two parsed streams into one collection
//! - Audit (provenance) enrichment

pub mod audit;
pub mod csv;
pub mod json;
pub mod unify;

pub use audit::enrich;
pub use unify::unify;
