//! Numeric preparation for charts: regression lines, histogram bins, density curves

use serde::Serialize;
use statrs::distribution::{Continuous, Normal};

/// Ordinary least squares line `y = intercept + slope * x`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fit a line through the points. `None` with fewer than two points or constant x.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        let n = points.len();
        if n < 2 {
            return None;
        }
        let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n as f64;
        let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n as f64;

        let (sxx, sxy) = points.iter().fold((0.0, 0.0), |(sxx, sxy), &(x, y)| {
            let dx = x - mean_x;
            (sxx + dx * dx, sxy + dx * (y - mean_y))
        });
        if sxx <= 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// One histogram bar, `[lower, upper)` except the last which is closed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width bins between the minimum and maximum value.
///
/// A constant series gets the range `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut lo, mut hi) = min_max(values);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + i as f64 * width,
            upper: if i + 1 == bins { hi } else { lo + (i + 1) as f64 * width },
            count,
        })
        .collect()
}

/// Scott's rule bandwidth: sample standard deviation times n^(-1/5).
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let bandwidth = var.sqrt() * (n as f64).powf(-0.2);
    (bandwidth > 0.0 && bandwidth.is_finite()).then_some(bandwidth)
}

/// Gaussian kernel density estimate evaluated on an even grid.
///
/// The grid extends three bandwidths past the data on each side.
pub fn gaussian_kde(values: &[f64], grid_points: usize) -> Option<Vec<(f64, f64)>> {
    let bandwidth = scott_bandwidth(values)?;
    if grid_points < 2 {
        return None;
    }
    let kernel = Normal::new(0.0, 1.0).ok()?;

    let (lo, hi) = min_max(values);
    let start = lo - 3.0 * bandwidth;
    let step = (hi - lo + 6.0 * bandwidth) / (grid_points - 1) as f64;
    let scale = 1.0 / (values.len() as f64 * bandwidth);

    let curve = (0..grid_points)
        .map(|i| {
            let x = start + i as f64 * step;
            let density = values
                .iter()
                .map(|v| kernel.pdf((x - v) / bandwidth))
                .sum::<f64>()
                * scale;
            (x, density)
        })
        .collect();
    Some(curve)
}

pub(crate) fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
