//! Shared test utilities and fixture generators
#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Raw frame as the loader sees it: every column a string, `?` for missing
///
/// Rows:
/// - 0: price missing
/// - 1: engine-size missing
/// - 2: both present
pub fn create_raw_dataframe() -> DataFrame {
    df! {
        "price" => ["?", "16500", "13950"],
        "engine-size" => ["130", "?", "152"],
    }
    .unwrap()
}

/// Small already-clean automobile frame covering every column the pipeline reads
pub fn create_auto_dataframe() -> DataFrame {
    df! {
        "make" => ["alfa-romero", "alfa-romero", "audi", "audi", "bmw", "bmw", "dodge", "honda", "porsche", "volvo"],
        "drive-wheels" => ["rwd", "rwd", "fwd", "4wd", "rwd", "rwd", "fwd", "fwd", "rwd", "rwd"],
        "body-style" => ["convertible", "hatchback", "sedan", "sedan", "sedan", "sedan", "hatchback", "sedan", "hardtop", "wagon"],
        "engine-location" => ["front", "front", "front", "front", "front", "front", "front", "front", "rear", "front"],
        "wheel-base" => [88.6f64, 94.5, 99.8, 99.4, 101.2, 101.2, 93.7, 96.5, 89.5, 104.3],
        "length" => [168.8f64, 171.2, 176.6, 176.6, 176.8, 176.8, 157.3, 175.4, 168.9, 188.8],
        "width" => [64.1f64, 65.5, 66.2, 66.4, 64.8, 64.8, 63.8, 65.2, 65.0, 67.2],
        "curb-weight" => [2548.0f64, 2823.0, 2337.0, 2824.0, 2395.0, 2710.0, 1918.0, 2289.0, 2756.0, 2912.0],
        "engine-size" => [130.0f64, 152.0, 109.0, 136.0, 108.0, 164.0, 90.0, 110.0, 194.0, 141.0],
        "bore" => [3.47f64, 2.68, 3.19, 3.19, 3.5, 3.31, 2.97, 3.15, 3.74, 3.78],
        "horsepower" => [111.0f64, 154.0, 102.0, 115.0, 101.0, 121.0, 68.0, 86.0, 207.0, 114.0],
        "peak-rpm" => [5000.0f64, 5000.0, 5500.0, 5500.0, 5800.0, 4250.0, 5500.0, 5800.0, 5900.0, 5400.0],
        "city-mpg" => [21.0f64, 19.0, 24.0, 18.0, 23.0, 21.0, 31.0, 27.0, 17.0, 23.0],
        "highway-mpg" => [27.0f64, 26.0, 30.0, 22.0, 29.0, 28.0, 38.0, 33.0, 25.0, 28.0],
        "price" => [13495.0f64, 16500.0, 13950.0, 17450.0, 16430.0, 20970.0, 6377.0, 8845.0, 32528.0, 12940.0],
    }
    .unwrap()
}

/// Frame with known correlation patterns
pub fn create_correlation_test_dataframe() -> DataFrame {
    df! {
        "a" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        "b" => [2.0f64, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0], // b = 2a
        "c" => [10.0f64, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0], // Perfect negative
        "d" => [5.0f64, 1.0, 8.0, 2.0, 9.0, 3.0, 7.0, 4.0, 6.0, 0.0],
        "label" => ["x", "y", "x", "y", "x", "y", "x", "y", "x", "y"],
    }
    .unwrap()
}

/// Write `contents` to a CSV file inside a fresh temporary directory
pub fn write_temp_csv(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("automobile.csv");
    std::fs::write(&csv_path, contents).unwrap();
    (temp_dir, csv_path)
}

/// A small raw CSV in the layout of the automobile dataset
pub fn sample_csv() -> String {
    [
        "symboling,normalized-losses,make,drive-wheels,body-style,engine-location,wheel-base,length,width,curb-weight,engine-size,bore,horsepower,peak-rpm,city-mpg,highway-mpg,price",
        "3,?,alfa-romero,rwd,convertible,front,88.6,168.8,64.1,2548,130,3.47,111,5000,21,27,13495",
        "3,?,alfa-romero,rwd,hatchback,front,94.5,171.2,65.5,2823,152,2.68,154,5000,19,26,16500",
        "2,164,audi,fwd,sedan,front,99.8,176.6,66.2,2337,109,3.19,102,5500,24,30,13950",
        "2,164,audi,4wd,sedan,front,99.4,176.6,66.4,2824,136,3.19,115,5500,18,22,17450",
        "2,192,bmw,rwd,sedan,front,101.2,176.8,64.8,2395,108,3.5,101,5800,23,29,16430",
        "0,?,bmw,rwd,sedan,front,101.2,176.8,64.8,2710,164,3.31,121,4250,21,28,20970",
        "1,118,dodge,fwd,hatchback,front,93.7,157.3,63.8,1918,90,2.97,68,5500,31,38,6377",
        "0,?,honda,fwd,sedan,front,96.5,175.4,65.2,2289,110,3.15,86,5800,27,33,?",
        "3,?,porsche,rwd,hardtop,rear,89.5,168.9,65.0,2756,194,3.74,207,5900,17,25,32528",
        "-1,74,volvo,rwd,wagon,front,104.3,188.8,67.2,2912,141,3.78,114,5400,23,28,12940",
    ]
    .join("\n")
        + "\n"
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "Expected {} to be within {} of {}",
        actual,
        tolerance,
        expected
    );
}
