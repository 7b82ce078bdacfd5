//! Command-line entry point for the tickfeed pipeline.

mod pipeline;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tickfeed_core::config::{JobConfig, OutputConfig, PipelineConfig, SourceConfig};
use tickfeed_store::FsRecordStore;
use tickfeed_tracker::Tracker;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tickfeed", about = "Market-event feed normalization pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the normalization pipeline over the CSV and JSON source trees.
    Run(RunArgs),
    /// Update or inspect the job status tracker.
    Track(TrackArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Root of the tree holding CSV-formatted line files.
    #[arg(long)]
    csv_root: PathBuf,
    /// Root of the tree holding JSON-formatted line files.
    #[arg(long)]
    json_root: PathBuf,
    /// Output directory; prior output there is overwritten.
    #[arg(long)]
    output: PathBuf,
    /// Job name used for status tracking.
    #[arg(long, default_value = "data_ingestion")]
    job_name: String,
    /// Tracker database; omit to skip status reporting.
    #[arg(long)]
    tracker_db: Option<PathBuf>,
}

#[derive(Args)]
struct TrackArgs {
    /// Tracker database path.
    #[arg(long)]
    db: PathBuf,
    /// Job name, e.g. preprocess_etl.
    #[arg(long)]
    job: String,
    /// Status to record (success, failed, ...); omit to read instead.
    #[arg(long)]
    status: Option<String>,
    /// Run date for reads; defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Track(args) => cmd_track(args),
    }
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let config = PipelineConfig {
        sources: SourceConfig {
            csv_root: args.csv_root,
            json_root: args.json_root,
        },
        output: OutputConfig { root: args.output },
        job: JobConfig {
            name: args.job_name,
            tracker_db: args.tracker_db,
        },
    };

    let store = FsRecordStore::new();
    let result = pipeline::run(&config, &store);

    // Report the run outcome whether or not the run succeeded.
    if let Some(db) = &config.job.tracker_db {
        let status = if result.is_ok() { "success" } else { "failed" };
        // A tracker hiccup must not eat the run's own outcome.
        match Tracker::open(&config.job.name, db) {
            Ok(tracker) => {
                if let Err(err) = tracker.update_job_status(status) {
                    error!(%err, "could not update job status");
                }
            }
            Err(err) => error!(%err, "could not open tracker database"),
        }
    }

    let summary = result?;
    if summary.skipped {
        println!("Warning: no records produced - write skipped");
    } else {
        println!("Combined count: {}", summary.total);
        for (partition, count) in &summary.counts {
            println!("  partition={partition}: {count}");
        }
        println!("Output written to {}", config.output.root.display());
    }
    Ok(())
}

fn cmd_track(args: TrackArgs) -> Result<()> {
    let tracker = Tracker::open(&args.job, &args.db)?;
    match args.status {
        Some(status) => {
            let job_id = tracker.update_job_status(&status)?;
            println!("{job_id} -> {status}");
        }
        None => {
            let date = args.date.unwrap_or_else(|| Utc::now().date_naive());
            let job_id = tracker.assign_job_id(date);
            match tracker.get_job_status(&job_id)? {
                Some(row) => {
                    println!("{}: status={}, updated={}", row.job_id, row.status, row.updated_time)
                }
                None => println!("No record found for {job_id}"),
            }
        }
    }
    Ok(())
}
