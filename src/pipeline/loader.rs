//! Dataset loader for local CSV files and CSV resources served over HTTP

use std::fmt;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info};
use polars::prelude::*;
use reqwest::blocking::Client;

use super::error::LoadError;
use crate::utils::{create_spinner, finish_with_success};

/// Public copy of the automobile dataset used when no input is given
pub const DEFAULT_DATA_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBMDeveloperSkillsNetwork-DA0101EN-SkillsNetwork/labs/Data%20files/automobileEDA.csv";

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of rows used for CSV schema inference
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10000;

/// Where the CSV comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl DataSource {
    /// `http://` and `https://` locations are URLs, anything else is a path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::Path(PathBuf::from(location))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{}", url),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Knobs for a single load
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub timeout: Duration,
    /// Rows used for schema inference. 0 means full scan.
    pub infer_schema_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
        }
    }
}

/// Load the dataset in a single attempt.
pub fn load_dataset(source: &DataSource, options: &LoadOptions) -> Result<DataFrame, LoadError> {
    let bytes = match source {
        DataSource::Url(url) => fetch_url(url, options.timeout)?,
        DataSource::Path(path) => std::fs::read(path).map_err(|e| LoadError::Io {
            location: path.display().to_string(),
            source: e,
        })?,
    };
    debug!("Read {} bytes from {}", bytes.len(), source);

    parse_csv(bytes, options.infer_schema_length, &source.to_string())
}

/// Load with a spinner, returning the frame and its shape.
pub fn load_dataset_with_progress(
    source: &DataSource,
    options: &LoadOptions,
) -> Result<(DataFrame, usize, usize), LoadError> {
    let message = match source {
        DataSource::Url(_) => "Downloading dataset...",
        DataSource::Path(_) => "Reading dataset...",
    };
    let spinner = create_spinner(message);

    let result = load_dataset(source, options);
    match &result {
        Ok(_) => finish_with_success(&spinner, "Dataset loaded"),
        Err(_) => spinner.finish_and_clear(),
    }

    let df = result?;
    let (rows, cols) = df.shape();
    info!("Loaded {} rows x {} columns from {}", rows, cols, source);
    Ok((df, rows, cols))
}

fn fetch_url(url: &str, timeout: Duration) -> Result<Vec<u8>, LoadError> {
    let http_error = |e: reqwest::Error| {
        if e.is_timeout() {
            LoadError::Timeout {
                location: url.to_string(),
                timeout_secs: timeout.as_secs(),
            }
        } else {
            LoadError::Http {
                location: url.to_string(),
                source: e,
            }
        }
    };

    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(http_error)?;

    let response = client.get(url).send().map_err(http_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::HttpStatus {
            location: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().map_err(http_error)?;
    Ok(bytes.to_vec())
}

/// Parse CSV bytes with a mandatory header row.
pub fn parse_csv(
    bytes: Vec<u8>,
    infer_schema_length: usize,
    location: &str,
) -> Result<DataFrame, LoadError> {
    let malformed = |reason: String| LoadError::Malformed {
        location: location.to_string(),
        reason,
    };

    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(malformed("no header row".to_string()));
    }

    // 0 means full table scan
    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(schema_length)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| malformed(e.to_string()))?;

    if df.width() == 0 {
        return Err(malformed("no columns".to_string()));
    }

    Ok(df)
}
