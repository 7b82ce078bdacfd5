//! Local-filesystem record store.

use crate::{RecordStore, SourceLine};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tickfeed_core::{Error, Record, RecordType, Result};
use tracing::debug;
use walkdir::WalkDir;

/// Record store backed by local directory trees.
///
/// Input is any tree of line-delimited text files. Output is a hive-style
/// layout, one `partition=T|Q|B` directory per group, each holding a
/// JSONL part file. The write lands in a staging directory first and is
/// renamed into place, so a rerun overwrites rather than appends and a
/// reader never sees a half-written output set.
#[derive(Debug, Default)]
pub struct FsRecordStore;

impl FsRecordStore {
    pub fn new() -> Self {
        Self
    }
}

impl RecordStore for FsRecordStore {
    fn read_lines(&self, root: &Path) -> Result<Vec<SourceLine>> {
        if !root.exists() {
            return Err(Error::store(format!(
                "input root does not exist: {}",
                root.display()
            )));
        }

        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();
        // Deterministic run-to-run ordering.
        files.sort();

        let mut lines = Vec::new();
        for path in files {
            let file = File::open(&path)?;
            let reader = BufReader::new(file);
            for line in reader.lines() {
                let text = line?;
                if text.trim().is_empty() {
                    continue;
                }
                lines.push(SourceLine {
                    path: path.clone(),
                    text,
                });
            }
            debug!(path = %path.display(), "read input file");
        }
        Ok(lines)
    }

    fn write_partitioned(
        &self,
        dest: &Path,
        groups: &BTreeMap<RecordType, Vec<Record>>,
    ) -> Result<()> {
        let staging = sibling_dir(dest, "staging");
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;

        for (partition, records) in groups {
            let part_dir = staging.join(format!("partition={partition}"));
            fs::create_dir_all(&part_dir)?;
            let part_file = part_dir.join("part-00000.jsonl");
            let mut out = BufWriter::new(File::create(&part_file)?);
            for record in records {
                serde_json::to_writer(&mut out, record)?;
                out.write_all(b"\n")?;
            }
            out.flush()?;
            debug!(partition = %partition, count = records.len(), "wrote partition");
        }

        // Swap the finished set into place. The prior set is moved aside
        // first, not deleted, so some complete output exists at every
        // point of the swap.
        let retired = sibling_dir(dest, "old");
        if retired.exists() {
            fs::remove_dir_all(&retired)?;
        }
        let had_prior = dest.exists();
        if had_prior {
            fs::rename(dest, &retired)?;
        }
        fs::rename(&staging, dest)?;
        if had_prior {
            fs::remove_dir_all(&retired)?;
        }
        Ok(())
    }
}

fn sibling_dir(dest: &Path, suffix: &str) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    dest.with_file_name(format!(".{name}.{suffix}"))
}
