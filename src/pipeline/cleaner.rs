//! Missing-value normalisation and numeric coercion

use anyhow::{Context, Result};
use log::{debug, warn};
use polars::prelude::*;
use serde::Serialize;

/// Placeholder used in the raw data for "no value"
pub const MISSING_SENTINEL: &str = "?";

/// Columns expected to hold numbers once the sentinel is gone
pub const NUMERIC_COLUMNS: [&str; 16] = [
    "symboling",
    "normalized-losses",
    "wheel-base",
    "length",
    "width",
    "height",
    "curb-weight",
    "engine-size",
    "bore",
    "stroke",
    "compression-ratio",
    "horsepower",
    "peak-rpm",
    "city-mpg",
    "highway-mpg",
    "price",
];

/// Per-column coercion outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoercedColumn {
    pub column: String,
    /// Non-null cells that could not be read as a finite number
    pub unparseable: usize,
    /// Nulls after coercion
    pub null_count: usize,
}

/// What the cleaner did to the dataset
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningReport {
    pub sentinels_replaced: usize,
    pub coerced: Vec<CoercedColumn>,
}

/// Coerce-or-null: a cell is a finite number or it is absent.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Keep only the candidates that exist in the dataset, preserving order.
pub fn present_columns(df: &DataFrame, candidates: &[&str]) -> Vec<String> {
    let names = df.get_column_names();
    candidates
        .iter()
        .filter(|c| names.iter().any(|n| n.as_str() == **c))
        .map(|c| c.to_string())
        .collect()
}

/// Replace every string cell equal to the sentinel with null.
///
/// Returns the frame and the number of replaced cells.
pub fn replace_sentinel(mut df: DataFrame) -> Result<(DataFrame, usize)> {
    let string_columns: Vec<PlSmallStr> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype() == &DataType::String)
        .map(|c| c.name().clone())
        .collect();

    let mut replaced = 0;
    for name in string_columns {
        let cleaned = {
            let ca = df.column(name.as_str())?.as_materialized_series().str()?;
            let hits = ca
                .into_iter()
                .filter(|v| *v == Some(MISSING_SENTINEL))
                .count();
            if hits == 0 {
                continue;
            }
            replaced += hits;
            debug!("Replacing {} sentinel cell(s) in '{}'", hits, name);

            let cleaned: StringChunked = ca
                .into_iter()
                .map(|v| v.filter(|s| *s != MISSING_SENTINEL))
                .collect();
            cleaned.with_name(name.clone())
        };
        df.with_column(cleaned.into_series())
            .with_context(|| format!("Failed to replace sentinel in column '{}'", name))?;
    }

    Ok((df, replaced))
}

/// Rebuild each target column as Float64 using [`parse_numeric`].
///
/// Targets missing from the frame are skipped with a warning.
pub fn coerce_numeric(mut df: DataFrame, targets: &[String]) -> Result<(DataFrame, Vec<CoercedColumn>)> {
    let mut coerced = Vec::with_capacity(targets.len());

    for target in targets {
        let Ok(column) = df.column(target) else {
            warn!("Numeric column '{}' not in dataset, skipping coercion", target);
            continue;
        };

        let (values, unparseable) = coerce_column(column)
            .with_context(|| format!("Failed to coerce column '{}'", target))?;
        let null_count = values.iter().filter(|v| v.is_none()).count();

        df.with_column(Series::new(target.as_str().into(), values))?;
        coerced.push(CoercedColumn {
            column: target.clone(),
            unparseable,
            null_count,
        });
    }

    Ok((df, coerced))
}

fn coerce_column(column: &Column) -> Result<(Vec<Option<f64>>, usize)> {
    if column.dtype() == &DataType::String {
        let ca = column.as_materialized_series().str()?;
        let mut unparseable = 0;
        let values: Vec<Option<f64>> = ca
            .into_iter()
            .map(|raw| {
                let raw = raw?;
                let parsed = parse_numeric(raw);
                if parsed.is_none() {
                    unparseable += 1;
                }
                parsed
            })
            .collect();
        return Ok((values, unparseable));
    }

    // Already typed: cast, then drop NaN / infinities
    let before = column.null_count();
    let as_float = column.cast(&DataType::Float64)?;
    let values: Vec<Option<f64>> = as_float
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect();
    let after = values.iter().filter(|v| v.is_none()).count();
    Ok((values, after.saturating_sub(before)))
}

/// Run the full cleaning stage: sentinel replacement then coercion.
pub fn clean_dataset(df: DataFrame, targets: &[String]) -> Result<(DataFrame, CleaningReport)> {
    let (df, sentinels_replaced) = replace_sentinel(df)?;
    let (df, coerced) = coerce_numeric(df, targets)?;
    Ok((
        df,
        CleaningReport {
            sentinels_replaced,
            coerced,
        },
    ))
}
