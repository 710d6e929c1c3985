//! Static chart rendering with plotters
//!
//! Each [`ChartSpec`] becomes one PNG in the output directory. A failure on
//! one chart never affects the others.

use std::error::Error;
use std::path::{Path, PathBuf};

use log::debug;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use thiserror::Error;

use super::charts::{ChartData, ChartSpec};
use super::geometry::{min_max, HistogramBin, LinearFit};
use crate::pipeline::PivotTable;
use crate::utils::create_progress_bar;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to draw '{title}': {message}")]
    Draw { title: String, message: String },
}

type DrawResult = Result<(), Box<dyn Error>>;

const REGRESSION_SIZE: (u32, u32) = (600, 400);
const BOXPLOT_SIZE: (u32, u32) = (800, 500);
const HEATMAP_SIZE: (u32, u32) = (1000, 600);
const DISTRIBUTION_SIZE: (u32, u32) = (700, 400);

const FONT: &str = "sans-serif";

const POINT_COLOR: RGBColor = RGBColor(31, 119, 180);
const FIT_COLOR: RGBColor = RGBColor(214, 39, 40);
const BAR_COLOR: RGBColor = RGBColor(76, 114, 176);

const PALETTE: [RGBColor; 8] = [
    RGBColor(76, 114, 176),
    RGBColor(221, 132, 82),
    RGBColor(85, 168, 104),
    RGBColor(196, 78, 82),
    RGBColor(129, 114, 179),
    RGBColor(147, 120, 96),
    RGBColor(218, 139, 195),
    RGBColor(140, 140, 140),
];

// Red - white - blue stops of the heatmap palette
const DIVERGING_LOW: (f64, f64, f64) = (178.0, 24.0, 43.0);
const DIVERGING_MID: (f64, f64, f64) = (247.0, 247.0, 247.0);
const DIVERGING_HIGH: (f64, f64, f64) = (33.0, 102.0, 172.0);

/// Create the output directory if needed.
pub fn ensure_output_dir(dir: &Path) -> Result<(), RenderError> {
    std::fs::create_dir_all(dir).map_err(|e| RenderError::OutputDir {
        path: dir.display().to_string(),
        source: e,
    })
}

/// Draw a single chart into `out_dir`, returning the written file.
pub fn render_chart(spec: &ChartSpec, out_dir: &Path) -> Result<PathBuf, RenderError> {
    let path = out_dir.join(&spec.file_name);

    let result = match &spec.data {
        ChartData::Scatter {
            points,
            fit,
            y_from_zero,
        } => draw_regression(spec, &path, points, fit.as_ref(), *y_from_zero),
        ChartData::Groups(groups) => draw_boxplot(spec, &path, groups),
        ChartData::Heatmap(pivot) => draw_heatmap(spec, &path, pivot),
        ChartData::Bins(bins) => draw_histogram(spec, &path, bins),
        ChartData::Curve(curve) => draw_density(spec, &path, curve),
    };

    result.map_err(|e| RenderError::Draw {
        title: spec.title.clone(),
        message: e.to_string(),
    })?;
    debug!("Wrote {}", path.display());
    Ok(path)
}

/// Render every chart in order, one result per chart.
pub fn render_all(specs: &[ChartSpec], out_dir: &Path) -> Vec<Result<PathBuf, RenderError>> {
    let pb = create_progress_bar(specs.len() as u64, "Rendering charts");
    let results = specs
        .iter()
        .map(|spec| {
            let result = render_chart(spec, out_dir);
            pb.inc(1);
            result
        })
        .collect();
    pb.finish_and_clear();
    results
}

/// Colour for `value` on the red-white-blue scale spanning `[lo, hi]`.
pub fn diverging_color(value: f64, lo: f64, hi: f64) -> RGBColor {
    let t = if hi > lo && value.is_finite() {
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let (from, to, u) = if t < 0.5 {
        (DIVERGING_LOW, DIVERGING_MID, t * 2.0)
    } else {
        (DIVERGING_MID, DIVERGING_HIGH, (t - 0.5) * 2.0)
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * u).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

/// Data range with 5% padding on each side; widened when degenerate.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let values: Vec<f64> = values.filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return (0.0, 1.0);
    }
    let (lo, hi) = min_max(&values);
    if lo == hi {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn segment_label(value: &SegmentValue<&String>) -> String {
    match value {
        SegmentValue::Exact(label) | SegmentValue::CenterOf(label) => label.to_string(),
        SegmentValue::Last => String::new(),
    }
}

fn draw_regression(
    spec: &ChartSpec,
    path: &Path,
    points: &[(f64, f64)],
    fit: Option<&LinearFit>,
    y_from_zero: bool,
) -> DrawResult {
    let root = BitMapBackend::new(path, REGRESSION_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_lo, x_hi) = padded_range(points.iter().map(|p| p.0));
    let (mut y_lo, y_hi) = padded_range(points.iter().map(|p| p.1));
    if y_from_zero && y_hi > 0.0 {
        y_lo = 0.0;
    }

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, (FONT, 20).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 3, POINT_COLOR.mix(0.6).filled())),
    )?;

    if let Some(fit) = fit {
        chart.draw_series(LineSeries::new(
            [(x_lo, fit.at(x_lo)), (x_hi, fit.at(x_hi))],
            FIT_COLOR.stroke_width(2),
        ))?;
    }

    root.present()?;
    Ok(())
}

fn draw_boxplot(spec: &ChartSpec, path: &Path, groups: &[(String, Vec<f64>)]) -> DrawResult {
    let root = BitMapBackend::new(path, BOXPLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let labels: Vec<String> = groups.iter().map(|(label, _)| label.clone()).collect();
    let (y_lo, y_hi) = padded_range(groups.iter().flat_map(|(_, values)| values.iter().copied()));

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, (FONT, 20).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(labels[..].into_segmented(), y_lo as f32..y_hi as f32)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&segment_label)
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .draw()?;

    chart.draw_series(groups.iter().enumerate().map(|(i, (_, values))| {
        let quartiles = Quartiles::new(values);
        Boxplot::new_vertical(SegmentValue::CenterOf(&labels[i]), &quartiles)
            .width(40)
            .whisker_width(0.5)
            .style(PALETTE[i % PALETTE.len()].stroke_width(2))
    }))?;

    root.present()?;
    Ok(())
}

fn draw_heatmap(spec: &ChartSpec, path: &Path, pivot: &PivotTable) -> DrawResult {
    let root = BitMapBackend::new(path, HEATMAP_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let columns = &pivot.column_labels;
    // Plot y grows upwards; reverse so the first row is drawn at the top
    let rows: Vec<String> = pivot.row_labels.iter().rev().cloned().collect();
    let (lo, hi) = pivot.value_range().unwrap_or((0.0, 1.0));

    // Cell (r, c) is centred on integer coordinates
    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, (FONT, 20).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(
            -0.5..columns.len() as f64 - 0.5,
            -0.5..rows.len() as f64 - 0.5,
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(columns.len())
        .y_labels(rows.len())
        .x_label_formatter(&|x: &f64| cell_label(columns, *x))
        .y_label_formatter(&|y: &f64| cell_label(&rows, *y))
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .draw()?;

    let cells: Vec<(usize, usize)> = (0..pivot.row_labels.len())
        .flat_map(|r| (0..columns.len()).map(move |c| (r, c)))
        .collect();
    let centre = |r: usize, c: usize| (c as f64, (rows.len() - 1 - r) as f64);

    chart.draw_series(cells.iter().map(|&(r, c)| {
        let (x, y) = centre(r, c);
        Rectangle::new(
            [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
            diverging_color(pivot.cells[r][c], lo, hi).filled(),
        )
    }))?;

    let annotation = (FONT, 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart.draw_series(cells.iter().map(|&(r, c)| {
        Text::new(
            format!("{:.0}", pivot.cells[r][c]),
            centre(r, c),
            annotation.clone(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Label for a tick that falls on a cell centre, empty otherwise
fn cell_label(labels: &[String], position: f64) -> String {
    let index = position.round();
    if (position - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

fn draw_histogram(spec: &ChartSpec, path: &Path, bins: &[HistogramBin]) -> DrawResult {
    let root = BitMapBackend::new(path, DISTRIBUTION_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let x_lo = bins.first().map(|b| b.lower).unwrap_or(0.0);
    let x_hi = bins.last().map(|b| b.upper).unwrap_or(1.0);
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, (FONT, 20).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, 0.0..max_count as f64 * 1.1)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .draw()?;

    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new(
            [(b.lower, 0.0), (b.upper, b.count as f64)],
            BAR_COLOR.mix(0.8).filled(),
        )
    }))?;
    // Bar outlines
    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new(
            [(b.lower, 0.0), (b.upper, b.count as f64)],
            BLACK.stroke_width(1),
        )
    }))?;

    root.present()?;
    Ok(())
}

fn draw_density(spec: &ChartSpec, path: &Path, curve: &[(f64, f64)]) -> DrawResult {
    let root = BitMapBackend::new(path, DISTRIBUTION_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_lo, x_hi) = padded_range(curve.iter().map(|p| p.0));
    let y_hi = curve.iter().map(|p| p.1).fold(0.0, f64::max);
    let y_hi = if y_hi > 0.0 { y_hi * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, (FONT, 20).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(x_lo..x_hi, 0.0..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .y_label_formatter(&|v| format!("{:.1e}", v))
        .draw()?;

    chart.draw_series(
        AreaSeries::new(curve.iter().copied(), 0.0, BAR_COLOR.mix(0.3).filled())
            .border_style(BAR_COLOR.stroke_width(2)),
    )?;

    root.present()?;
    Ok(())
}
