//! Descriptive statistics for numeric and categorical columns

use std::collections::HashMap;

use log::warn;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use super::columns::{label_values, numeric_values, string_column_names};
use super::error::StatsError;

/// count / mean / std / quartiles for one numeric column
#[derive(Debug, Clone, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// count / unique / mode for one categorical column
#[derive(Debug, Clone, Serialize)]
pub struct CategoricalSummary {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

/// Summarise a set of present values. Every statistic is NaN when empty.
pub fn summarize_values(column: &str, values: &[f64]) -> NumericSummary {
    let n = values.len();
    if n == 0 {
        return NumericSummary {
            column: column.to_string(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        };
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mean = values.iter().sum::<f64>() / n as f64;
    // Sample standard deviation, undefined for a single value
    let std = if n > 1 {
        (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    NumericSummary {
        column: column.to_string(),
        count: n,
        mean,
        std,
        min: sorted[0],
        q25: percentile(&sorted, 25.0),
        median: percentile(&sorted, 50.0),
        q75: percentile(&sorted, 75.0),
        max: sorted[n - 1],
    }
}

/// Percentile of sorted values using linear interpolation (NumPy compatible).
pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    let n = sorted_values.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted_values[0];
    }

    let rank = (p / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lower as f64;

    if lower == upper {
        sorted_values[lower]
    } else {
        sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
    }
}

/// Numeric summaries for the requested columns, in request order.
///
/// Absent or non-numeric columns are skipped with a warning.
pub fn describe_numeric(df: &DataFrame, columns: &[String]) -> Vec<NumericSummary> {
    columns
        .par_iter()
        .filter_map(|name| match numeric_values(df, name) {
            Ok(values) => {
                let present: Vec<f64> = values.into_iter().flatten().collect();
                Some(summarize_values(name, &present))
            }
            Err(e) => {
                warn!("Skipping numeric summary: {}", e);
                None
            }
        })
        .collect()
}

/// Categorical summaries for every string column.
pub fn describe_categorical(df: &DataFrame) -> Vec<CategoricalSummary> {
    string_column_names(df)
        .iter()
        .filter_map(|name| match value_counts(df, name) {
            Ok(counts) => {
                let (top, freq) = counts
                    .first()
                    .map(|(value, count)| (Some(value.clone()), *count))
                    .unwrap_or((None, 0));
                Some(CategoricalSummary {
                    column: name.clone(),
                    count: counts.iter().map(|(_, c)| c).sum(),
                    unique: counts.len(),
                    top,
                    freq,
                })
            }
            Err(e) => {
                warn!("Skipping categorical summary: {}", e);
                None
            }
        })
        .collect()
}

/// Occurrences of each distinct non-null value, most frequent first.
///
/// Ties keep the order in which the values first appear.
pub fn value_counts(df: &DataFrame, column: &str) -> Result<Vec<(String, usize)>, StatsError> {
    let values = label_values(df, column)?;

    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for value in values.into_iter().flatten() {
        match index.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    // Stable sort keeps first-appearance order among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(counts)
}
