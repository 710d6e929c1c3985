//! Console tables for every summary the pipeline prints

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use polars::prelude::*;

use crate::pipeline::{
    CategoricalSummary, CleaningReport, CorrelationMatrix, NumericSummary, PearsonResult,
    PivotTable,
};

/// Correlations at or above this magnitude are highlighted
const STRONG_CORRELATION: f64 = 0.7;

fn new_table(headers: Vec<String>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        headers
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

fn number_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Fixed three-decimal formatting, `NaN` for missing values
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.3}", value)
    }
}

/// Format with `digits` significant digits, switching to exponent notation
/// for very small or very large magnitudes. Trailing zeros are dropped.
pub fn format_significant(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let digits = digits.max(1);
    let exponent = value.abs().log10().floor() as i32;

    if exponent < -4 || exponent >= digits as i32 {
        let formatted = format!("{:.*e}", digits - 1, value);
        match formatted.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{}", trim_zeros(mantissa), exp),
            None => formatted,
        }
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn display_value(value: AnyValue) -> String {
    match value {
        AnyValue::Null => "NaN".to_string(),
        AnyValue::String(s) => s.to_string(),
        other => other.to_string().trim_matches('"').to_string(),
    }
}

/// First `rows` rows of the dataset
pub fn preview_table(df: &DataFrame, rows: usize) -> Table {
    let head = df.head(Some(rows));
    let mut table = new_table(
        head.get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect(),
    );

    for i in 0..head.height() {
        let row: Vec<String> = head
            .get_columns()
            .iter()
            .map(|col| {
                col.get(i)
                    .map(display_value)
                    .unwrap_or_else(|_| "?".to_string())
            })
            .collect();
        table.add_row(row);
    }
    table
}

/// Column name, dtype and null count
pub fn dtypes_table(df: &DataFrame) -> Table {
    let mut table = new_table(vec!["Column".into(), "Type".into(), "Nulls".into()]);
    for col in df.get_columns() {
        let nulls = col.null_count();
        table.add_row(vec![
            Cell::new(col.name().as_str()),
            Cell::new(col.dtype().to_string()).fg(Color::Cyan),
            Cell::new(nulls).fg(if nulls > 0 { Color::Yellow } else { Color::White }),
        ]);
    }
    table
}

pub fn cleaning_table(report: &CleaningReport) -> Table {
    let mut table = new_table(vec![
        "Column".into(),
        "Unparseable".into(),
        "Nulls after coercion".into(),
    ]);
    for coerced in &report.coerced {
        table.add_row(vec![
            Cell::new(&coerced.column),
            Cell::new(coerced.unparseable).fg(if coerced.unparseable > 0 {
                Color::Red
            } else {
                Color::White
            }),
            Cell::new(coerced.null_count),
        ]);
    }
    table
}

pub fn correlation_table(matrix: &CorrelationMatrix) -> Table {
    let mut headers = vec![String::new()];
    headers.extend(matrix.columns.iter().cloned());
    let mut table = new_table(headers);

    for (name, row) in matrix.columns.iter().zip(matrix.rows()) {
        let mut cells = vec![Cell::new(name).add_attribute(Attribute::Bold)];
        cells.extend(row.into_iter().map(|r| {
            let cell = number_cell(format_float(r));
            if r.abs() >= STRONG_CORRELATION && r < 1.0 {
                cell.fg(Color::Green)
            } else {
                cell
            }
        }));
        table.add_row(cells);
    }
    table
}

/// One row per column: count, mean, std, min, quartiles, max
pub fn numeric_summary_table(summaries: &[NumericSummary]) -> Table {
    let headers = ["Column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"];
    let mut table = new_table(headers.iter().map(|h| h.to_string()).collect());

    for s in summaries {
        table.add_row(vec![
            Cell::new(&s.column).add_attribute(Attribute::Bold),
            number_cell(s.count.to_string()),
            number_cell(format_float(s.mean)),
            number_cell(format_float(s.std)),
            number_cell(format_float(s.min)),
            number_cell(format_float(s.q25)),
            number_cell(format_float(s.median)),
            number_cell(format_float(s.q75)),
            number_cell(format_float(s.max)),
        ]);
    }
    table
}

pub fn categorical_summary_table(summaries: &[CategoricalSummary]) -> Table {
    let headers = ["Column", "count", "unique", "top", "freq"];
    let mut table = new_table(headers.iter().map(|h| h.to_string()).collect());

    for s in summaries {
        table.add_row(vec![
            Cell::new(&s.column).add_attribute(Attribute::Bold),
            number_cell(s.count.to_string()),
            number_cell(s.unique.to_string()),
            Cell::new(s.top.as_deref().unwrap_or("NaN")),
            number_cell(s.freq.to_string()),
        ]);
    }
    table
}

pub fn value_counts_table(column: &str, counts: &[(String, usize)]) -> Table {
    let mut table = new_table(vec![column.to_string(), "count".into()]);
    for (value, count) in counts {
        table.add_row(vec![Cell::new(value), number_cell(count.to_string())]);
    }
    table
}

/// Rows are `row_key` labels, columns are `column_key` labels
pub fn pivot_table(pivot: &PivotTable) -> Table {
    let mut headers = vec![format!("{} \\ {}", pivot.row_key, pivot.column_key)];
    headers.extend(pivot.column_labels.iter().cloned());
    let mut table = new_table(headers);

    for (label, row) in pivot.row_labels.iter().zip(&pivot.cells) {
        let mut cells = vec![Cell::new(label).add_attribute(Attribute::Bold)];
        cells.extend(row.iter().map(|v| number_cell(format_float(*v))));
        table.add_row(cells);
    }
    table
}

/// Coefficient to 3 decimals, p-value to 5 significant digits
pub fn pearson_table(results: &[PearsonResult]) -> Table {
    let mut table = new_table(vec![
        "Column".into(),
        "Against".into(),
        "r".into(),
        "p-value".into(),
        "n".into(),
    ]);

    for result in results {
        table.add_row(vec![
            Cell::new(&result.column).add_attribute(Attribute::Bold),
            Cell::new(&result.against),
            number_cell(format!("{:.3}", result.coefficient)),
            number_cell(format_significant(result.p_value, 5)).fg(if result.p_value < 0.001 {
                Color::Green
            } else {
                Color::White
            }),
            number_cell(result.observations.to_string()),
        ]);
    }
    table
}
