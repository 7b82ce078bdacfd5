//! The pipeline run: read, parse, unify, enrich, write.

use chrono::Utc;
use rayon::prelude::*;
use tickfeed_core::{PipelineConfig, Record, Result, SourcedRecord};
use tickfeed_ingestion::{audit, csv, json, unify};
use tickfeed_store::{writer, PartitionCounts, RecordStore, SourceLine, WriteOutcome};
use tracing::info;

/// What one run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Combined record count across both sources.
    pub total: usize,
    /// Count per partition value.
    pub counts: PartitionCounts,
    /// True when zero records were produced and the write was skipped.
    pub skipped: bool,
}

/// Execute the full normalization pipeline against a record store.
///
/// Parse failures become bad records and never abort the run; a write
/// failure (or an unreadable input root) propagates to the caller.
pub fn run<S: RecordStore + Sync>(config: &PipelineConfig, store: &S) -> Result<RunSummary> {
    let csv_lines = store.read_lines(&config.sources.csv_root)?;
    let json_lines = store.read_lines(&config.sources.json_root)?;
    info!(
        csv_lines = csv_lines.len(),
        json_lines = json_lines.len(),
        "input sources loaded"
    );

    // Per-line parsing is pure and stateless; fan out, fan in,
    // preserving input order.
    let csv_records = parse_all(csv_lines, csv::parse_line);
    let json_records = parse_all(json_lines, json::parse_line);

    let combined = unify(csv_records, json_records);
    let enriched = audit::enrich(combined, Utc::now());
    let total = enriched.len();
    info!(total, "combined record count");

    match writer::write(store, &config.output.root, enriched)? {
        WriteOutcome::Written { counts } => Ok(RunSummary {
            total,
            counts,
            skipped: false,
        }),
        WriteOutcome::SkippedEmpty => Ok(RunSummary {
            total: 0,
            counts: PartitionCounts::new(),
            skipped: true,
        }),
    }
}

fn parse_all(lines: Vec<SourceLine>, parse: fn(&str) -> Record) -> Vec<SourcedRecord> {
    lines
        .into_par_iter()
        .map(|line| SourcedRecord {
            record: parse(&line.text),
            source: line.path,
        })
        .collect()
}
