//! Audit (provenance) enrichment.
//!
//! Attaches the originating file path, its base name, and the ingestion
//! timestamp to every unified record. Purely additive; no domain field is
//! touched and no I/O happens here.

use chrono::{DateTime, Utc};
use tickfeed_core::{Record, SourcedRecord};

/// Attach audit fields to every record in the unified collection.
pub fn enrich(records: Vec<SourcedRecord>, ingest_timestamp: DateTime<Utc>) -> Vec<Record> {
    records
        .into_iter()
        .map(|sourced| {
            let mut record = sourced.record;
            record.source_file = sourced
                .source
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
            record.source_path = Some(sourced.source.to_string_lossy().into_owned());
            record.ingest_timestamp = Some(ingest_timestamp);
            record
        })
        .collect()
}
