//! Error types for the analysis pipeline.
//!
//! Only [`LoadError`] is fatal. [`StatsError`] values are reported per
//! computation and the pipeline moves on to the next one.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Failure to obtain the input dataset. Aborts the run.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The request did not complete within the configured timeout.
    #[error("Timed out after {timeout_secs}s fetching {location}")]
    Timeout { location: String, timeout_secs: u64 },

    /// Transport-level failure (DNS, TLS, connection reset, ...).
    #[error("Failed to fetch {location}: {source}")]
    Http {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status code.
    #[error("Failed to fetch {location}: HTTP status {status}")]
    HttpStatus { location: String, status: u16 },

    /// Local file could not be read.
    #[error("Failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// Bytes were obtained but do not form a CSV with a header row.
    #[error("Malformed CSV in {location}: {reason}")]
    Malformed { location: String, reason: String },
}

/// Non-fatal failure of a single statistic or chart data slice.
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("Column '{column}' is not numeric (dtype {dtype})")]
    NotNumeric { column: String, dtype: String },

    #[error(
        "Not enough data for '{column_a}' vs '{column_b}': {observations} paired observation(s), need at least {required}"
    )]
    InsufficientData {
        column_a: String,
        column_b: String,
        observations: usize,
        required: usize,
    },

    #[error("No present values in '{0}'")]
    EmptyInput(String),

    #[error("Column '{0}' has zero variance")]
    ConstantInput(String),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

impl StatsError {
    /// Whether the failure only means "skip this computation".
    ///
    /// Polars errors point at a bug or a corrupt frame rather than at the data.
    pub fn is_skippable(&self) -> bool {
        !matches!(self, StatsError::Polars(_))
    }
}
