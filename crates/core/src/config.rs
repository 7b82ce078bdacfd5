//! Configuration structures for the tickfeed pipeline.
//!
//! Everything the run needs is passed in explicitly; there is no ambient
//! or global pipeline state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Input source configuration.
    pub sources: SourceConfig,
    /// Output configuration.
    pub output: OutputConfig,
    /// Job identity / tracking configuration.
    pub job: JobConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sources: SourceConfig::default(),
            output: OutputConfig::default(),
            job: JobConfig::default(),
        }
    }
}

/// Input source trees, one per wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Root of the tree holding CSV-formatted lines.
    pub csv_root: PathBuf,
    /// Root of the tree holding JSON-formatted lines.
    pub json_root: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            csv_root: PathBuf::from("data/csv"),
            json_root: PathBuf::from("data/json"),
        }
    }
}

/// Output location configuration. Reruns overwrite prior output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the partitioned record set.
    pub root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("output"),
        }
    }
}

/// Job identity used for status tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Job name, e.g. `data_ingestion`; combined with the run date to
    /// form the tracker's job id.
    pub name: String,
    /// Tracker database path; `None` disables status reporting.
    pub tracker_db: Option<PathBuf>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            name: "data_ingestion".to_string(),
            tracker_db: None,
        }
    }
}
