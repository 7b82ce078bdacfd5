//! Core types and configuration for the tickfeed pipeline.
//!
//! This crate provides shared types used across all other crates:
//! - The unified market-event record schema (trades, quotes, bad records)
//! - Pipeline configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use types::*;
