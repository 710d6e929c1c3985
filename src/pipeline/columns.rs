//! Typed column access shared by the statistics

use polars::prelude::*;

use super::error::StatsError;

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// Column as nullable f64 values. Fails on absent or non-numeric columns.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, StatsError> {
    if !has_column(df, name) {
        return Err(StatsError::MissingColumn(name.to_string()));
    }
    let column = df.column(name)?;
    if !column.dtype().is_primitive_numeric() {
        return Err(StatsError::NotNumeric {
            column: name.to_string(),
            dtype: column.dtype().to_string(),
        });
    }

    let as_float = column.cast(&DataType::Float64)?;
    let values = as_float
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect();
    Ok(values)
}

/// Column rendered as nullable strings, whatever its dtype.
pub fn label_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, StatsError> {
    if !has_column(df, name) {
        return Err(StatsError::MissingColumn(name.to_string()));
    }
    let as_string = df.column(name)?.cast(&DataType::String)?;
    let values = as_string
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

/// Names of the primitive-numeric columns, in frame order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|c| c.dtype().is_primitive_numeric())
        .map(|c| c.name().to_string())
        .collect()
}

/// Names of the string columns, in frame order.
pub fn string_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|c| c.dtype() == &DataType::String)
        .map(|c| c.name().to_string())
        .collect()
}
