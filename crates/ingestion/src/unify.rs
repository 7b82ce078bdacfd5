//! Merging of the CSV-derived and JSON-derived record collections.

use tickfeed_core::SourcedRecord;

/// Merge the two parsed collections into one logical stream.
///
/// The unified schema is a fixed superset: every column either parser can
/// populate exists on [`tickfeed_core::Record`] as an `Option`, so a
/// column absent from one source is already null there and the merge can
/// never reject a shape mismatch, even if the parsers grow disjoint
/// optional fields later.
///
/// Ordering is source-then-arrival: all CSV records in input order, then
/// all JSON records in input order. No interleaving by ingestion time.
pub fn unify(csv: Vec<SourcedRecord>, json: Vec<SourcedRecord>) -> Vec<SourcedRecord> {
    let mut combined = Vec::with_capacity(csv.len() + json.len());
    combined.extend(csv);
    combined.extend(json);
    combined
}
