//! Tests for console formatting, the run summary and the JSON report

use std::time::Duration;

use autoeda::pipeline::{
    clean_dataset, correlation_matrix, describe_categorical, describe_numeric, grouped_mean_pivot,
    pearson_with_p_value, present_columns, value_counts, CleaningReport, NUMERIC_COLUMNS,
};
use autoeda::report::{
    build_report, correlation_table, export_report, format_float, format_significant,
    pearson_table, pivot_table, preview_table, EdaSummary, ReportInputs,
};
use polars::prelude::*;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_format_significant() {
    assert_eq!(format_significant(0.123456, 5), "0.12346");
    assert_eq!(format_significant(0.5, 5), "0.5");
    assert_eq!(format_significant(12.0, 5), "12");
    assert_eq!(format_significant(0.00012345, 5), "0.00012345");
    assert_eq!(format_significant(1.5e-9, 5), "1.5e-9");
    assert_eq!(format_significant(0.0, 5), "0");
    assert_eq!(format_significant(f64::NAN, 5), "NaN");
}

#[test]
fn test_format_float() {
    assert_eq!(format_float(0.87654), "0.877");
    assert_eq!(format_float(-1.0), "-1.000");
    assert_eq!(format_float(f64::NAN), "NaN");
}

#[test]
fn test_preview_shows_nulls_as_nan() {
    let df = df! {
        "make" => [Some("audi"), None],
        "price" => [Some(13950.0f64), None],
    }
    .unwrap();

    let rendered = preview_table(&df, 5).to_string();

    assert!(rendered.contains("audi"));
    assert!(rendered.contains("13950"));
    assert!(rendered.contains("NaN"));
    assert!(!rendered.contains('"'));
}

#[test]
fn test_summary_tables_render_labels() {
    let df = common::create_auto_dataframe();

    let matrix = correlation_matrix(&df).unwrap();
    let rendered = correlation_table(&matrix).to_string();
    assert!(rendered.contains("engine-size"));
    assert!(rendered.contains("1.000"));

    let pivot = grouped_mean_pivot(&df, "drive-wheels", "body-style", "price").unwrap();
    let rendered = pivot_table(&pivot).to_string();
    assert!(rendered.contains("18700.000"));
    assert!(rendered.contains("convertible"));

    let result = pearson_with_p_value(&df, "engine-size", "price").unwrap();
    let rendered = pearson_table(&[result.clone()]).to_string();
    assert!(rendered.contains(&format!("{:.3}", result.coefficient)));
}

#[test]
fn test_run_summary_counters() {
    let mut summary = EdaSummary::new(205, 29);

    summary.record_stat();
    summary.record_stat();
    summary.skip_stat("Pearson bore vs price");
    summary.record_chart();
    summary.skip_chart("Price density (KDE)");
    summary.record_timing("Load", Duration::from_millis(250));
    summary.record_timing("Statistics", Duration::from_millis(750));

    assert_eq!(summary.stats_computed, 2);
    assert_eq!(summary.stats_skipped.len(), 1);
    assert_eq!(summary.charts_written, 1);
    assert_eq!(summary.charts_skipped, vec!["Price density (KDE)"]);
    assert_eq!(summary.total_time(), Duration::from_secs(1));
}

#[test]
fn test_report_contents() {
    let (_dir, path) = common::write_temp_csv(&common::sample_csv());
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path))
        .unwrap()
        .finish()
        .unwrap();
    let targets = present_columns(&df, &NUMERIC_COLUMNS);
    let (df, cleaning) = clean_dataset(df, &targets).unwrap();

    let matrix = correlation_matrix(&df).unwrap();
    let numeric = describe_numeric(&df, &targets);
    let categorical = describe_categorical(&df);
    let counts = value_counts(&df, "drive-wheels").unwrap();
    let pivot = grouped_mean_pivot(&df, "drive-wheels", "body-style", "price").unwrap();
    let pearson = vec![pearson_with_p_value(&df, "horsepower", "price").unwrap()];
    let skipped = vec![(
        "bore".to_string(),
        "price".to_string(),
        "not enough data".to_string(),
    )];
    let charts = vec!["eda_charts/01_regression_engine-size.png".to_string()];

    let inputs = ReportInputs {
        source: "automobile.csv",
        rows: df.height(),
        columns: df.width(),
        cleaning: &cleaning,
        correlation: Some(&matrix),
        numeric_summary: &numeric,
        categorical_summary: &categorical,
        value_counts: Some(("drive-wheels", counts.as_slice())),
        pivot: Some(&pivot),
        pearson: &pearson,
        pearson_skipped: &skipped,
        charts: &charts,
    };

    let json = serde_json::to_value(build_report(&inputs)).unwrap();

    assert_eq!(json["metadata"]["source"], "automobile.csv");
    assert_eq!(json["metadata"]["rows"], 10);
    assert_eq!(json["metadata"]["autoeda_version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(
        json["correlation"]["columns"].as_array().unwrap().len(),
        matrix.len()
    );
    assert_eq!(json["numeric_summary"].as_array().unwrap().len(), targets.len());
    assert_eq!(json["pivot"]["row_labels"][0], "4wd");
    assert_eq!(json["pearson"]["computed"][0]["column"], "horsepower");
    assert_eq!(json["pearson"]["skipped"][0]["reason"], "not enough data");
    assert_eq!(json["charts"][0], "eda_charts/01_regression_engine-size.png");
}

#[test]
fn test_undefined_correlations_export_as_null() {
    let df = df! {
        "x" => [1.0f64, 2.0, 3.0],
        "flat" => [4.0f64, 4.0, 4.0],
    }
    .unwrap();
    let matrix = correlation_matrix(&df).unwrap();
    let cleaning = CleaningReport::default();

    let inputs = ReportInputs {
        source: "memory",
        rows: 3,
        columns: 2,
        cleaning: &cleaning,
        correlation: Some(&matrix),
        numeric_summary: &[],
        categorical_summary: &[],
        value_counts: None,
        pivot: None,
        pearson: &[],
        pearson_skipped: &[],
        charts: &[],
    };

    let json = serde_json::to_value(build_report(&inputs)).unwrap();

    assert!(json["correlation"]["rows"][0][1].is_null());
    assert_eq!(json["correlation"]["rows"][0][0], 1.0);
    assert!(json.get("pivot").is_none());
    assert!(json.get("value_counts").is_none());
}

#[test]
fn test_export_writes_pretty_json() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("report.json");
    let cleaning = CleaningReport::default();

    let inputs = ReportInputs {
        source: "memory",
        rows: 0,
        columns: 0,
        cleaning: &cleaning,
        correlation: None,
        numeric_summary: &[],
        categorical_summary: &[],
        value_counts: None,
        pivot: None,
        pearson: &[],
        pearson_skipped: &[],
        charts: &[],
    };

    export_report(&inputs, &output).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("\n  \"metadata\""));
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(json["cleaning"]["sentinels_replaced"], 0);
}

#[test]
fn test_export_to_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("missing").join("report.json");
    let cleaning = CleaningReport::default();

    let inputs = ReportInputs {
        source: "memory",
        rows: 0,
        columns: 0,
        cleaning: &cleaning,
        correlation: None,
        numeric_summary: &[],
        categorical_summary: &[],
        value_counts: None,
        pivot: None,
        pearson: &[],
        pearson_skipped: &[],
        charts: &[],
    };

    let err = export_report(&inputs, &output).unwrap_err();

    assert!(err.to_string().contains("Failed to write report"));
}
