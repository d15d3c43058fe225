//! Error types for bikeshare_stats.
//!
//! Loading and aggregation report failures through [`BikeshareError`]. None of
//! them are retried internally; the caller decides whether to ask for a
//! different query.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for loading and aggregating trip data.
#[derive(Error, Debug)]
pub enum BikeshareError {
    /// A source row could not be interpreted, or a required column is absent.
    #[error("Malformed input in {}{}: {reason}", .path.display(), line_suffix(.line))]
    MalformedInput {
        /// The file being read
        path: PathBuf,
        /// 1-based CSV line, when the failure is tied to a row
        line: Option<u64>,
        /// What was wrong
        reason: String,
    },

    /// A statistic that needs at least one trip was asked for over none.
    #[error("No trips available to compute {statistic}")]
    EmptyData {
        /// Name of the statistic group that was requested
        statistic: &'static str,
    },

    /// Month or day value outside the selectable sets.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// City name not present in the catalog.
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl BikeshareError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, line: Option<u64>, reason: impl Into<String>) -> Self {
        BikeshareError::MalformedInput {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// True for errors that mean "the filters matched nothing" rather than a broken input.
    pub fn is_empty_data(&self) -> bool {
        matches!(self, BikeshareError::EmptyData { .. })
    }
}

fn line_suffix(line: &Option<u64>) -> String {
    match line {
        Some(line) => format!(" (line {line})"),
        None => String::new(),
    }
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, BikeshareError>;
