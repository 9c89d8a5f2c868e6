//! # Survey Common Library
//!
//! Shared code for the survey dashboard:
//! - Snapshot data model and column contract
//! - Aggregation pipeline (counts, tags, ordered frequencies, group summaries)
//! - Response store accessor with time-boxed snapshot reuse
//! - Configuration loading and store credential resolution
//! - Error taxonomy

pub mod columns;
pub mod config;
pub mod db;
pub mod error;
pub mod pipeline;
pub mod snapshot;

pub use error::{Error, Result};
pub use snapshot::{CellValue, Snapshot};
