//! Output module for writing crawl analytics
//!
//! This module handles:
//! - Formatting an [`AnalyticsReport`](crate::analytics::AnalyticsReport) as
//!   a line-oriented text report
//! - Writing the report file
//! - Printing a short summary to the terminal

mod report;

pub use report::{format_report, print_summary, write_report};

use thiserror::Error;

/// Errors that can occur while writing output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
