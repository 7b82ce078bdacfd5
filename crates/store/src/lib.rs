//! Batch record store boundary for the tickfeed pipeline.
//!
//! This crate handles:
//! - The `RecordStore` trait the pipeline reads from and writes to
//! - A local-filesystem implementation (directory trees of line files in,
//!   hive-style `partition=` directories of JSONL out)
//! - The partitioned writer (per-partition counts, empty-run handling)

pub mod fs;
pub mod writer;

pub use fs::FsRecordStore;
pub use writer::{write, PartitionCounts, WriteOutcome};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tickfeed_core::{Record, RecordType, Result};

/// One raw text line together with the path of the file it came from.
#[derive(Debug, Clone)]
pub struct SourceLine {
    pub path: PathBuf,
    pub text: String,
}

/// The external batch record store.
///
/// Supplies line iteration over an input tree (carrying the originating
/// file path per line) and accepts a partitioned write in overwrite mode.
/// The pipeline core never does storage I/O itself.
pub trait RecordStore {
    /// List every file under `root` and return its lines in file order.
    fn read_lines(&self, root: &Path) -> Result<Vec<SourceLine>>;

    /// Persist the grouped records under `dest`, one group per partition,
    /// replacing any prior output at that location wholesale.
    fn write_partitioned(
        &self,
        dest: &Path,
        groups: &BTreeMap<RecordType, Vec<Record>>,
    ) -> Result<()>;
}
