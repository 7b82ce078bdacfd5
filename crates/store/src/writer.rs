//! Partitioned write of the enriched record set.

use crate::RecordStore;
use std::collections::BTreeMap;
use std::path::Path;
use tickfeed_core::{Record, RecordType, Result};
use tracing::{info, warn};

/// Record count per partition value.
pub type PartitionCounts = BTreeMap<RecordType, usize>;

/// Outcome of a partitioned write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Records were grouped and persisted.
    Written { counts: PartitionCounts },
    /// Zero records after parsing both sources; nothing was written.
    /// Usually a sign of parser or input-path misconfiguration.
    SkippedEmpty,
}

impl WriteOutcome {
    /// Total record count across partitions (zero when skipped).
    pub fn total(&self) -> usize {
        match self {
            WriteOutcome::Written { counts } => counts.values().sum(),
            WriteOutcome::SkippedEmpty => 0,
        }
    }
}

/// Group the enriched records by partition and persist them to the store.
///
/// An empty collection skips the write and reports a warning outcome; a
/// store failure propagates unmodified. The write replaces prior output
/// at `dest` (overwrite, not append), so rerunning over the same
/// collection is idempotent.
pub fn write<S: RecordStore>(store: &S, dest: &Path, records: Vec<Record>) -> Result<WriteOutcome> {
    if records.is_empty() {
        warn!("no records to write - check parser output and input paths");
        return Ok(WriteOutcome::SkippedEmpty);
    }

    let mut groups: BTreeMap<RecordType, Vec<Record>> = BTreeMap::new();
    for record in records {
        groups.entry(record.partition).or_default().push(record);
    }

    let counts: PartitionCounts = groups
        .iter()
        .map(|(partition, group)| (*partition, group.len()))
        .collect();
    for (partition, count) in &counts {
        info!(partition = %partition, count, "partition count");
    }

    store.write_partitioned(dest, &groups)?;
    info!(dest = %dest.display(), total = counts.values().sum::<usize>(), "partitioned write complete");
    Ok(WriteOutcome::Written { counts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickfeed_core::{CommonFields, Error, QuoteFields, TradeFields};

    fn trade() -> Record {
        Record::trade(CommonFields::default(), TradeFields::default())
    }

    fn quote() -> Record {
        Record::quote(CommonFields::default(), QuoteFields::default())
    }

    /// Store that records what it was asked to write.
    #[derive(Default)]
    struct SpyStore {
        written: std::cell::RefCell<Vec<PartitionCounts>>,
        fail: bool,
    }

    impl RecordStore for SpyStore {
        fn read_lines(&self, _root: &Path) -> Result<Vec<crate::SourceLine>> {
            Ok(Vec::new())
        }

        fn write_partitioned(
            &self,
            _dest: &Path,
            groups: &BTreeMap<RecordType, Vec<Record>>,
        ) -> Result<()> {
            if self.fail {
                return Err(Error::store("disk full"));
            }
            self.written.borrow_mut().push(
                groups
                    .iter()
                    .map(|(partition, group)| (*partition, group.len()))
                    .collect(),
            );
            Ok(())
        }
    }

    #[test]
    fn test_counts_per_partition() {
        let store = SpyStore::default();
        let outcome = write(
            &store,
            Path::new("out"),
            vec![trade(), trade(), quote(), Record::bad()],
        )
        .unwrap();

        let WriteOutcome::Written { counts } = outcome else {
            panic!("expected a write");
        };
        assert_eq!(counts[&RecordType::Trade], 2);
        assert_eq!(counts[&RecordType::Quote], 1);
        assert_eq!(counts[&RecordType::Bad], 1);
        assert_eq!(store.written.borrow().len(), 1);
    }

    #[test]
    fn test_empty_skips_write_with_warning_outcome() {
        let store = SpyStore::default();
        let outcome = write(&store, Path::new("out"), Vec::new()).unwrap();
        assert_eq!(outcome, WriteOutcome::SkippedEmpty);
        assert_eq!(outcome.total(), 0);
        assert!(store.written.borrow().is_empty());
    }

    #[test]
    fn test_store_failure_propagates() {
        let store = SpyStore {
            fail: true,
            ..Default::default()
        };
        let err = write(&store, Path::new("out"), vec![trade()]).unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }

    #[test]
    fn test_rerun_reports_same_counts() {
        let store = SpyStore::default();
        let records = vec![trade(), quote()];
        let first = write(&store, Path::new("out"), records.clone()).unwrap();
        let second = write(&store, Path::new("out"), records).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.written.borrow()[0], store.written.borrow()[1]);
    }
}
