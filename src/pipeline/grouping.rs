//! Grouped aggregates: mean pivot tables and per-category value lists

use std::collections::{BTreeSet, HashMap};

use polars::prelude::*;
use serde::Serialize;

use super::columns::{has_column, label_values, numeric_values};
use super::error::StatsError;

/// Mean of a value column per (row key, column key) combination
#[derive(Debug, Clone, Serialize)]
pub struct PivotTable {
    pub row_key: String,
    pub column_key: String,
    pub value_column: String,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    /// `cells[row][col]`; combinations with no observations hold 0.0
    pub cells: Vec<Vec<f64>>,
}

impl PivotTable {
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.row_labels.iter().position(|r| r == row)?;
        let j = self.column_labels.iter().position(|c| c == column)?;
        Some(self.cells[i][j])
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty() || self.column_labels.is_empty()
    }

    /// Smallest and largest cell, for colour scaling
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Group by two keys, average `value_column`, and pivot into a 2-D table.
///
/// Rows with a null key are dropped, null values are ignored in the mean,
/// and cells with no observations are 0.0. Labels are sorted.
pub fn grouped_mean_pivot(
    df: &DataFrame,
    row_key: &str,
    column_key: &str,
    value_column: &str,
) -> Result<PivotTable, StatsError> {
    for name in [row_key, column_key] {
        if !has_column(df, name) {
            return Err(StatsError::MissingColumn(name.to_string()));
        }
    }
    // Also validates that the value column is numeric
    numeric_values(df, value_column)?;

    let grouped = df
        .clone()
        .lazy()
        .select([
            col(row_key).cast(DataType::String).alias("row"),
            col(column_key).cast(DataType::String).alias("col"),
            col(value_column).cast(DataType::Float64).alias("value"),
        ])
        .filter(col("row").is_not_null().and(col("col").is_not_null()))
        .group_by([col("row"), col("col")])
        .agg([col("value").mean()])
        .collect()?;

    let rows = grouped.column("row")?.as_materialized_series().str()?;
    let cols = grouped.column("col")?.as_materialized_series().str()?;
    let means = grouped.column("value")?.f64()?;

    let mut row_labels = BTreeSet::new();
    let mut column_labels = BTreeSet::new();
    let mut observed: Vec<(String, String, Option<f64>)> = Vec::with_capacity(grouped.height());
    for ((r, c), m) in rows.into_iter().zip(cols.into_iter()).zip(means.into_iter()) {
        if let (Some(r), Some(c)) = (r, c) {
            row_labels.insert(r.to_string());
            column_labels.insert(c.to_string());
            observed.push((r.to_string(), c.to_string(), m));
        }
    }

    let row_labels: Vec<String> = row_labels.into_iter().collect();
    let column_labels: Vec<String> = column_labels.into_iter().collect();
    let mut cells = vec![vec![0.0; column_labels.len()]; row_labels.len()];

    for (r, c, mean) in observed {
        let Some(mean) = mean.filter(|m| m.is_finite()) else {
            continue;
        };
        if let (Ok(i), Ok(j)) = (row_labels.binary_search(&r), column_labels.binary_search(&c)) {
            cells[i][j] = mean;
        }
    }

    Ok(PivotTable {
        row_key: row_key.to_string(),
        column_key: column_key.to_string(),
        value_column: value_column.to_string(),
        row_labels,
        column_labels,
        cells,
    })
}

/// Present values of `value_column` per category of `key`, in first-appearance order.
///
/// Categories whose values are all absent are left out.
pub fn grouped_values(
    df: &DataFrame,
    key: &str,
    value_column: &str,
) -> Result<Vec<(String, Vec<f64>)>, StatsError> {
    let keys = label_values(df, key)?;
    let values = numeric_values(df, value_column)?;

    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (k, v) in keys.into_iter().zip(values) {
        let (Some(k), Some(v)) = (k, v) else {
            continue;
        };
        match index.get(&k) {
            Some(&i) => groups[i].1.push(v),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![v]));
            }
        }
    }

    Ok(groups)
}
