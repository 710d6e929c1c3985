//! Pearson correlation: full matrix and single pairs with significance

use faer::Mat;
use log::debug;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use super::columns::{numeric_column_names, numeric_values};
use super::error::StatsError;

/// Minimum paired observations for a Pearson test
pub const MIN_PEARSON_OBSERVATIONS: usize = 3;

/// Column every Pearson test is run against
pub const PEARSON_TARGET: &str = "price";

/// Columns tested against [`PEARSON_TARGET`], in report order
pub const PEARSON_COLUMNS: [&str; 9] = [
    "wheel-base",
    "horsepower",
    "length",
    "width",
    "curb-weight",
    "engine-size",
    "bore",
    "city-mpg",
    "highway-mpg",
];

/// Symmetric correlation matrix over the numeric columns
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Mat<f64>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Coefficient for a pair of column names
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[(i, j)])
    }

    /// Row-major copy, for display and export
    pub fn rows(&self) -> Vec<Vec<f64>> {
        (0..self.len())
            .map(|i| (0..self.len()).map(|j| self.values[(i, j)]).collect())
            .collect()
    }
}

/// Pearson coefficient with its two-sided p-value
#[derive(Debug, Clone, Serialize)]
pub struct PearsonResult {
    pub column: String,
    pub against: String,
    pub coefficient: f64,
    pub p_value: f64,
    pub observations: usize,
}

/// Pearson correlation over the rows where both values are present.
///
/// Returns the coefficient and the number of complete pairs, or `None` when
/// fewer than two pairs remain or either side has zero variance.
pub fn pairwise_pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<(f64, usize)> {
    // Single-pass Welford update for numerical stability
    let mut n = 0usize;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut m2_x = 0.0;
    let mut m2_y = 0.0;
    let mut co_moment = 0.0;

    for (a, b) in x.iter().zip(y.iter()) {
        if let (Some(a), Some(b)) = (a, b) {
            n += 1;
            let dx = a - mean_x;
            let dy = b - mean_y;
            mean_x += dx / n as f64;
            mean_y += dy / n as f64;
            m2_x += dx * (a - mean_x);
            m2_y += dy * (b - mean_y);
            co_moment += dx * (b - mean_y);
        }
    }

    if n < 2 || m2_x <= 0.0 || m2_y <= 0.0 {
        return None;
    }

    let r = co_moment / (m2_x.sqrt() * m2_y.sqrt());
    Some((r.clamp(-1.0, 1.0), n))
}

/// Correlation matrix over every primitive-numeric column.
///
/// Each pair only uses rows where both columns are present. Pairs that cannot
/// be computed hold NaN. The diagonal is 1.0.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix, StatsError> {
    let columns = numeric_column_names(df);
    let n = columns.len();

    let data: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|name| numeric_values(df, name))
        .collect::<Result<_, _>>()?;

    // Upper triangle, computed in parallel
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();

    let coefficients: Vec<(usize, usize, f64)> = pairs
        .par_iter()
        .map(|&(i, j)| {
            let r = pairwise_pearson(&data[i], &data[j])
                .map(|(r, _)| r)
                .unwrap_or(f64::NAN);
            (i, j, r)
        })
        .collect();

    let mut values = Mat::<f64>::zeros(n, n);
    for i in 0..n {
        values[(i, i)] = 1.0;
    }
    for (i, j, r) in coefficients {
        values[(i, j)] = r;
        values[(j, i)] = r;
    }

    debug!("Correlation matrix computed over {} numeric columns", n);
    Ok(CorrelationMatrix { columns, values })
}

/// Complete-case `(x, y)` pairs for two numeric columns
pub fn paired_values(df: &DataFrame, x: &str, y: &str) -> Result<Vec<(f64, f64)>, StatsError> {
    let xs = numeric_values(df, x)?;
    let ys = numeric_values(df, y)?;

    Ok(xs
        .into_iter()
        .zip(ys)
        .filter_map(|(a, b)| Some((a?, b?)))
        .collect())
}

/// Pearson coefficient and two-sided p-value for two columns.
pub fn pearson_with_p_value(
    df: &DataFrame,
    column_a: &str,
    column_b: &str,
) -> Result<PearsonResult, StatsError> {
    let pairs = paired_values(df, column_a, column_b)?;
    let n = pairs.len();

    if n < MIN_PEARSON_OBSERVATIONS {
        return Err(StatsError::InsufficientData {
            column_a: column_a.to_string(),
            column_b: column_b.to_string(),
            observations: n,
            required: MIN_PEARSON_OBSERVATIONS,
        });
    }

    let (xs, ys): (Vec<Option<f64>>, Vec<Option<f64>>) =
        pairs.iter().map(|&(a, b)| (Some(a), Some(b))).unzip();

    let Some((r, _)) = pairwise_pearson(&xs, &ys) else {
        let constant = if is_constant(pairs.iter().map(|p| p.0)) {
            column_a
        } else {
            column_b
        };
        return Err(StatsError::ConstantInput(constant.to_string()));
    };

    Ok(PearsonResult {
        column: column_a.to_string(),
        against: column_b.to_string(),
        coefficient: r,
        p_value: pearson_p_value(r, n),
        observations: n,
    })
}

/// Two-sided p-value for H0: rho = 0, via Student's t with n - 2 degrees of freedom.
pub fn pearson_p_value(r: f64, n: usize) -> f64 {
    if n < MIN_PEARSON_OBSERVATIONS || r.is_nan() {
        return f64::NAN;
    }
    if r.abs() >= 1.0 {
        return 0.0;
    }

    let dof = (n - 2) as f64;
    let t = r * (dof / (1.0 - r * r)).sqrt();

    match StudentsT::new(0.0, 1.0, dof) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}

fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}
