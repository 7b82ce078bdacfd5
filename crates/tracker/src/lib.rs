//! Job status tracking for the tickfeed pipeline.
//!
//! A keyed upsert store recording `(job_id, status, updated_time)`, where
//! `job_id = "<job_name>_<run_date>"`. The pipeline core never calls this
//! directly; the surrounding orchestrator reports each run's outcome
//! after the fact.

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use tickfeed_core::{Error, Result};
use tracing::info;

/// One tracked job status row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub job_id: String,
    pub status: String,
    pub updated_time: String,
}

/// Job status tracker backed by a SQLite database.
pub struct Tracker {
    job_name: String,
    conn: Connection,
}

impl Tracker {
    /// Open (or create) the tracker database at `path`.
    pub fn open(job_name: impl Into<String>, path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(sql_err)?;
        Self::with_connection(job_name, conn)
    }

    /// Open an in-memory tracker. Test/demo use.
    pub fn open_in_memory(job_name: impl Into<String>) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(sql_err)?;
        Self::with_connection(job_name, conn)
    }

    fn with_connection(job_name: impl Into<String>, conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS job_tracker (
                job_id       TEXT PRIMARY KEY,
                status       TEXT NOT NULL,
                updated_time TEXT NOT NULL
            )",
            [],
        )
        .map_err(sql_err)?;
        Ok(Self {
            job_name: job_name.into(),
            conn,
        })
    }

    /// Unique job id for a run date, convention `jobname_YYYY-MM-DD`.
    pub fn assign_job_id(&self, run_date: NaiveDate) -> String {
        format!("{}_{}", self.job_name, run_date)
    }

    /// Insert or update the status row for today's job id.
    pub fn update_job_status(&self, status: &str) -> Result<String> {
        let job_id = self.assign_job_id(Utc::now().date_naive());
        let updated_time = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO job_tracker (job_id, status, updated_time)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (job_id)
                 DO UPDATE SET status = excluded.status,
                               updated_time = excluded.updated_time",
                (&job_id, status, &updated_time),
            )
            .map_err(sql_err)?;
        info!(job_id, status, "job status updated");
        Ok(job_id)
    }

    /// Current status for a job id, if one has been recorded.
    pub fn get_job_status(&self, job_id: &str) -> Result<Option<JobStatus>> {
        self.conn
            .query_row(
                "SELECT job_id, status, updated_time FROM job_tracker WHERE job_id = ?1",
                [job_id],
                |row| {
                    Ok(JobStatus {
                        job_id: row.get(0)?,
                        status: row.get(1)?,
                        updated_time: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(sql_err)
    }
}

fn sql_err(err: rusqlite::Error) -> Error {
    Error::tracker(err.to_string())
}
