//! Command-line argument definitions using clap

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::pipeline::{
    DataSource, LoadOptions, DEFAULT_DATA_URL, DEFAULT_INFER_SCHEMA_LENGTH, DEFAULT_TIMEOUT_SECS,
};

/// Auto-EDA - exploratory analysis and charts for the automobile pricing dataset
#[derive(Parser, Debug)]
#[command(name = "autoeda")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// CSV input, either a local path or an http(s) URL
    #[arg(short, long, default_value = DEFAULT_DATA_URL)]
    pub input: String,

    /// Directory the PNG charts are written to (created if missing)
    #[arg(short, long, default_value = "eda_charts")]
    pub output_dir: PathBuf,

    /// Skip chart rendering, print the statistics only
    #[arg(long, default_value = "false")]
    pub no_charts: bool,

    /// HTTP timeout in seconds for remote inputs
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = validate_timeout)]
    pub timeout: u64,

    /// Number of rows shown in the dataset preview
    #[arg(long, default_value = "5")]
    pub head_rows: usize,

    /// Number of rows to use for schema inference.
    /// Use 0 for full table scan.
    #[arg(long, default_value_t = DEFAULT_INFER_SCHEMA_LENGTH)]
    pub infer_schema_length: usize,

    /// Also write the computed summaries to this JSON file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl Cli {
    pub fn source(&self) -> DataSource {
        DataSource::parse(&self.input)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            timeout: Duration::from_secs(self.timeout),
            infer_schema_length: self.infer_schema_length,
        }
    }

    /// Chart directory, or `None` when rendering is disabled
    pub fn chart_dir(&self) -> Option<&PathBuf> {
        (!self.no_charts).then_some(&self.output_dir)
    }
}

/// Validator for the timeout parameter
fn validate_timeout(s: &str) -> Result<u64, String> {
    let value: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number of seconds", s))?;

    if value == 0 {
        Err("timeout must be greater than 0 seconds".to_string())
    } else {
        Ok(value)
    }
}
