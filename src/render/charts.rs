//! The fixed chart sequence and the data slice each chart needs

use polars::prelude::*;

use super::geometry::{gaussian_kde, histogram, HistogramBin, LinearFit};
use crate::pipeline::{grouped_values, numeric_values, paired_values, PivotTable, StatsError};

/// Bars in the price histogram
pub const HISTOGRAM_BINS: usize = 20;

/// Evaluation points of the density curve
pub const DENSITY_GRID_POINTS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Regression,
    Boxplot,
    Heatmap,
    Histogram,
    Density,
}

impl ChartKind {
    pub fn slug(&self) -> &'static str {
        match self {
            ChartKind::Regression => "regression",
            ChartKind::Boxplot => "boxplot",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Histogram => "histogram",
            ChartKind::Density => "density",
        }
    }
}

/// Data drawn by a chart
#[derive(Debug, Clone)]
pub enum ChartData {
    Scatter {
        points: Vec<(f64, f64)>,
        fit: Option<LinearFit>,
        /// Pin the y axis at zero
        y_from_zero: bool,
    },
    Groups(Vec<(String, Vec<f64>)>),
    Heatmap(PivotTable),
    Bins(Vec<HistogramBin>),
    Curve(Vec<(f64, f64)>),
}

/// Everything needed to draw one figure
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub file_name: String,
    pub data: ChartData,
}

/// A chart that could not be planned
#[derive(Debug)]
pub struct SkippedChart {
    pub title: String,
    pub reason: StatsError,
}

/// Plan the fixed chart sequence. Charts missing their inputs come back as `Err`.
///
/// `pivot` is the drive-wheels x body-style average price table.
pub fn plan_charts(df: &DataFrame, pivot: Option<&PivotTable>) -> Vec<Result<ChartSpec, SkippedChart>> {
    let mut plans = vec![
        regression(df, 1, "engine-size", "Engine size", "Engine size vs Price (regression)", true),
        regression(df, 2, "highway-mpg", "Highway MPG", "Highway MPG vs Price (regression)", false),
        regression(df, 3, "peak-rpm", "Peak RPM", "Peak RPM vs Price (regression)", false),
        boxplot(df, 4, "body-style", "Body Style", "Price distribution by body style"),
        boxplot(df, 5, "engine-location", "Engine Location", "Price by engine location"),
    ];
    plans.push(heatmap(pivot, 6));
    plans.push(price_histogram(df, 7));
    plans.push(price_density(df, 8));
    plans
}

fn file_name(index: usize, kind: ChartKind, subject: &str) -> String {
    format!("{:02}_{}_{}.png", index, kind.slug(), subject)
}

fn skipped(title: &str, reason: StatsError) -> SkippedChart {
    SkippedChart {
        title: title.to_string(),
        reason,
    }
}

fn regression(
    df: &DataFrame,
    index: usize,
    x: &str,
    x_label: &str,
    title: &str,
    y_from_zero: bool,
) -> Result<ChartSpec, SkippedChart> {
    let points = paired_values(df, x, "price").map_err(|e| skipped(title, e))?;
    if points.is_empty() {
        return Err(skipped(
            title,
            StatsError::EmptyInput(format!("{} / price", x)),
        ));
    }

    Ok(ChartSpec {
        kind: ChartKind::Regression,
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: "Price".to_string(),
        file_name: file_name(index, ChartKind::Regression, x),
        data: ChartData::Scatter {
            fit: LinearFit::fit(&points),
            points,
            y_from_zero,
        },
    })
}

fn boxplot(
    df: &DataFrame,
    index: usize,
    key: &str,
    x_label: &str,
    title: &str,
) -> Result<ChartSpec, SkippedChart> {
    let groups = grouped_values(df, key, "price").map_err(|e| skipped(title, e))?;
    if groups.is_empty() {
        return Err(skipped(
            title,
            StatsError::EmptyInput(format!("{} / price", key)),
        ));
    }

    Ok(ChartSpec {
        kind: ChartKind::Boxplot,
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: "Price".to_string(),
        file_name: file_name(index, ChartKind::Boxplot, key),
        data: ChartData::Groups(groups),
    })
}

fn heatmap(pivot: Option<&PivotTable>, index: usize) -> Result<ChartSpec, SkippedChart> {
    let title = "Average price: drive-wheels x body-style (heatmap)";
    let pivot = match pivot {
        Some(p) if !p.is_empty() => p,
        Some(p) => {
            return Err(skipped(
                title,
                StatsError::EmptyInput(p.value_column.clone()),
            ))
        }
        None => {
            return Err(skipped(
                title,
                StatsError::MissingColumn("drive-wheels / body-style / price".to_string()),
            ))
        }
    };

    Ok(ChartSpec {
        kind: ChartKind::Heatmap,
        title: title.to_string(),
        x_label: "Body Style".to_string(),
        y_label: "Drive Wheels".to_string(),
        file_name: file_name(index, ChartKind::Heatmap, "price"),
        data: ChartData::Heatmap(pivot.clone()),
    })
}

fn present_prices(df: &DataFrame, title: &str) -> Result<Vec<f64>, SkippedChart> {
    let prices: Vec<f64> = numeric_values(df, "price")
        .map_err(|e| skipped(title, e))?
        .into_iter()
        .flatten()
        .collect();
    Ok(prices)
}

fn price_histogram(df: &DataFrame, index: usize) -> Result<ChartSpec, SkippedChart> {
    let title = "Price distribution (histogram)";
    let prices = present_prices(df, title)?;
    let bins = histogram(&prices, HISTOGRAM_BINS);
    if bins.is_empty() {
        return Err(skipped(
            title,
            StatsError::EmptyInput("price".to_string()),
        ));
    }

    Ok(ChartSpec {
        kind: ChartKind::Histogram,
        title: title.to_string(),
        x_label: "Price".to_string(),
        y_label: "Count".to_string(),
        file_name: file_name(index, ChartKind::Histogram, "price"),
        data: ChartData::Bins(bins),
    })
}

fn price_density(df: &DataFrame, index: usize) -> Result<ChartSpec, SkippedChart> {
    let title = "Price density (KDE)";
    let prices = present_prices(df, title)?;
    let Some(curve) = gaussian_kde(&prices, DENSITY_GRID_POINTS) else {
        // A single value has no spread either
        let reason = if prices.is_empty() {
            StatsError::EmptyInput("price".to_string())
        } else {
            StatsError::ConstantInput("price".to_string())
        };
        return Err(skipped(title, reason));
    };

    Ok(ChartSpec {
        kind: ChartKind::Density,
        title: title.to_string(),
        x_label: "Price".to_string(),
        y_label: "Density".to_string(),
        file_name: file_name(index, ChartKind::Density, "price"),
        data: ChartData::Curve(curve),
    })
}
