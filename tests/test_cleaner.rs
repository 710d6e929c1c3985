//! Tests for sentinel replacement and numeric coercion

use autoeda::pipeline::{
    clean_dataset, coerce_numeric, numeric_values, parse_numeric, pearson_with_p_value,
    present_columns, replace_sentinel, StatsError, NUMERIC_COLUMNS,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

fn targets(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_parse_numeric_coerce_or_null() {
    assert_eq!(parse_numeric("13950"), Some(13950.0));
    assert_eq!(parse_numeric(" 3.47 "), Some(3.47));
    assert_eq!(parse_numeric("-1"), Some(-1.0));
    assert_eq!(parse_numeric("?"), None);
    assert_eq!(parse_numeric(""), None);
    assert_eq!(parse_numeric("four"), None);
    assert_eq!(parse_numeric("NaN"), None);
    assert_eq!(parse_numeric("inf"), None);
}

#[test]
fn test_replace_sentinel_nulls_every_placeholder() {
    let df = df! {
        "make" => ["audi", "?", "bmw"],
        "price" => ["?", "?", "100"],
        "doors" => [2i32, 4, 4],
    }
    .unwrap();

    let (df, replaced) = replace_sentinel(df).unwrap();

    assert_eq!(replaced, 3);
    assert_eq!(df.column("make").unwrap().null_count(), 1);
    assert_eq!(df.column("price").unwrap().null_count(), 2);
    // Non-string columns are untouched
    assert_eq!(df.column("doors").unwrap().dtype(), &DataType::Int32);
}

#[test]
fn test_no_sentinel_remains_after_cleaning() {
    let (_dir, path) = common::write_temp_csv(&common::sample_csv());
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path))
        .unwrap()
        .finish()
        .unwrap();

    let numeric = present_columns(&df, &NUMERIC_COLUMNS);
    let (df, report) = clean_dataset(df, &numeric).unwrap();

    assert_eq!(report.sentinels_replaced, 6);
    for column in df.get_columns() {
        if column.dtype() == &DataType::String {
            let hits = column
                .as_materialized_series()
                .str()
                .unwrap()
                .into_iter()
                .filter(|v| *v == Some("?"))
                .count();
            assert_eq!(hits, 0, "Sentinel left in '{}'", column.name());
        }
    }
}

#[test]
fn test_targets_become_float64_with_finite_values() {
    let (_dir, path) = common::write_temp_csv(&common::sample_csv());
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path))
        .unwrap()
        .finish()
        .unwrap();

    let numeric = present_columns(&df, &NUMERIC_COLUMNS);
    let (df, _) = clean_dataset(df, &numeric).unwrap();

    for name in &numeric {
        let column = df.column(name).unwrap();
        assert_eq!(column.dtype(), &DataType::Float64, "'{}' not Float64", name);
        assert!(column.f64().unwrap().into_iter().flatten().all(f64::is_finite));
    }
    // Columns outside the target list keep their type
    assert_eq!(df.column("make").unwrap().dtype(), &DataType::String);
    assert_eq!(df.column("price").unwrap().null_count(), 1);
    assert_eq!(df.column("normalized-losses").unwrap().null_count(), 5);
}

#[test]
fn test_present_columns_keeps_order_and_skips_absent() {
    let df = common::create_raw_dataframe();

    let present = present_columns(&df, &NUMERIC_COLUMNS);

    // NUMERIC_COLUMNS lists engine-size before price
    assert_eq!(present, targets(&["engine-size", "price"]));
}

#[test]
fn test_coerce_counts_unparseable_cells() {
    let df = df! {
        "horsepower" => [Some("111"), Some("n/a"), None, Some("154")],
    }
    .unwrap();

    let (df, coerced) = coerce_numeric(df, &targets(&["horsepower"])).unwrap();

    assert_eq!(coerced.len(), 1);
    assert_eq!(coerced[0].unparseable, 1);
    assert_eq!(coerced[0].null_count, 2);
    assert_eq!(
        numeric_values(&df, "horsepower").unwrap(),
        vec![Some(111.0), None, None, Some(154.0)]
    );
}

#[test]
fn test_coerce_skips_missing_targets() {
    let df = common::create_raw_dataframe();

    let (df, coerced) = coerce_numeric(df, &targets(&["price", "not-a-column"])).unwrap();

    assert_eq!(coerced.len(), 1);
    assert_eq!(coerced[0].column, "price");
    assert_eq!(df.column("engine-size").unwrap().dtype(), &DataType::String);
}

#[test]
fn test_coerce_already_numeric_column() {
    let df = df! {
        "symboling" => [3i64, 1, -1],
    }
    .unwrap();

    let (df, coerced) = coerce_numeric(df, &targets(&["symboling"])).unwrap();

    assert_eq!(df.column("symboling").unwrap().dtype(), &DataType::Float64);
    assert_eq!(coerced[0].unparseable, 0);
    assert_eq!(
        numeric_values(&df, "symboling").unwrap(),
        vec![Some(3.0), Some(1.0), Some(-1.0)]
    );
}

#[test]
fn test_end_to_end_cleaning_scenario() {
    let df = common::create_raw_dataframe();

    let (df, report) = clean_dataset(df, &targets(&["price", "engine-size"])).unwrap();

    assert_eq!(report.sentinels_replaced, 2);
    let price = numeric_values(&df, "price").unwrap();
    let engine = numeric_values(&df, "engine-size").unwrap();
    assert_eq!(price, vec![None, Some(16500.0), Some(13950.0)]);
    assert_eq!(engine, vec![Some(130.0), None, Some(152.0)]);

    // Only row 2 is complete
    let err = pearson_with_p_value(&df, "engine-size", "price").unwrap_err();
    match err {
        StatsError::InsufficientData { observations, required, .. } => {
            assert_eq!(observations, 1);
            assert_eq!(required, 3);
        }
        other => panic!("Expected InsufficientData, got {:?}", other),
    }
}
