//! Auto-EDA: Exploratory Data Analysis CLI Tool
//!
//! Loads the automobile pricing dataset, cleans it, prints summary
//! statistics and writes a fixed set of charts.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use env_logger::Env;
use log::error;

use autoeda::cli::Cli;
use autoeda::pipeline::{
    clean_dataset, correlation_matrix, describe_categorical, describe_numeric,
    grouped_mean_pivot, load_dataset_with_progress, pearson_with_p_value, present_columns,
    value_counts, StatsError, MISSING_SENTINEL, NUMERIC_COLUMNS, PEARSON_COLUMNS, PEARSON_TARGET,
};
use autoeda::render::{ensure_output_dir, plan_charts, render_all};
use autoeda::report::{
    categorical_summary_table, cleaning_table, correlation_table, dtypes_table, export_report,
    numeric_summary_table, pearson_table, pivot_table, preview_table, value_counts_table,
    EdaSummary, ReportInputs,
};
use autoeda::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_info, print_section, print_skipped, print_step_header, print_step_time,
    print_success, print_table,
};

const VALUE_COUNTS_COLUMN: &str = "drive-wheels";
const PIVOT_ROW_KEY: &str = "drive-wheels";
const PIVOT_COLUMN_KEY: &str = "body-style";
const PIVOT_VALUE: &str = "price";

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let source = cli.source();

    // Print styled banner
    print_banner(env!("CARGO_PKG_VERSION"));

    let chart_dir = cli.chart_dir().map(|dir| dir.display().to_string());
    print_config(&source.to_string(), chart_dir.as_deref());

    // Load dataset - the only fatal stage
    let step_start = Instant::now();
    println!();
    let (df, rows, cols) = load_dataset_with_progress(&source, &cli.load_options())
        .with_context(|| format!("Could not load dataset from {}", source))?;

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);

    print_section(&format!("First {} rows", cli.head_rows.min(rows)));
    print_table(&preview_table(&df, cli.head_rows));

    let mut summary = EdaSummary::new(rows, cols);
    let load_elapsed = step_start.elapsed();
    summary.record_timing("Load", load_elapsed);
    print_step_time(load_elapsed);

    let mut step: u8 = 0;

    // Step 1: Missing values and type coercion
    step += 1;
    print_step_header(step, "Missing Values & Type Coercion");

    let step_start = Instant::now();
    let targets = present_columns(&df, &NUMERIC_COLUMNS);
    let spinner = create_spinner("Cleaning dataset...");
    let (df, cleaning) = clean_dataset(df, &targets)?;
    let unparseable: usize = cleaning.coerced.iter().map(|c| c.unparseable).sum();
    if unparseable > 0 {
        finish_with_warning(
            &spinner,
            &format!("Dataset cleaned, {} unparseable cell(s) set to null", unparseable),
        );
    } else {
        finish_with_success(&spinner, "Dataset cleaned");
    }

    summary.sentinels_replaced = cleaning.sentinels_replaced;
    print_info(&format!(
        "Replaced {} '{}' placeholder(s) with null",
        cleaning.sentinels_replaced, MISSING_SENTINEL
    ));

    if cleaning.coerced.is_empty() {
        print_info("None of the expected numeric columns are present");
    } else {
        print_section("Numeric coercion");
        print_table(&cleaning_table(&cleaning));
    }

    print_section("Column types after conversion");
    print_table(&dtypes_table(&df));

    let clean_elapsed = step_start.elapsed();
    summary.record_timing("Cleaning", clean_elapsed);
    print_step_time(clean_elapsed);

    // Step 2: Summary statistics
    step += 1;
    print_step_header(step, "Summary Statistics");

    let step_start = Instant::now();

    print_section("Correlation matrix");
    let correlation = match correlation_matrix(&df) {
        Ok(matrix) if !matrix.is_empty() => {
            print_table(&correlation_table(&matrix));
            summary.record_stat();
            Some(matrix)
        }
        Ok(_) => {
            print_skipped("Correlation matrix", "no numeric columns");
            summary.skip_stat("Correlation matrix");
            None
        }
        Err(e) => {
            skip_stat(&mut summary, "Correlation matrix", &e);
            None
        }
    };

    print_section("Numeric columns");
    let numeric_summary = describe_numeric(&df, &targets);
    if numeric_summary.is_empty() {
        print_skipped("Numeric summary", "no numeric columns");
        summary.skip_stat("Numeric summary");
    } else {
        print_table(&numeric_summary_table(&numeric_summary));
        summary.record_stat();
    }

    print_section("Categorical columns");
    let categorical_summary = describe_categorical(&df);
    if categorical_summary.is_empty() {
        print_skipped("Categorical summary", "no string columns");
        summary.skip_stat("Categorical summary");
    } else {
        print_table(&categorical_summary_table(&categorical_summary));
        summary.record_stat();
    }

    print_section(&format!("Value counts: {}", VALUE_COUNTS_COLUMN));
    let counts = match value_counts(&df, VALUE_COUNTS_COLUMN) {
        Ok(counts) => {
            print_table(&value_counts_table(VALUE_COUNTS_COLUMN, &counts));
            summary.record_stat();
            Some(counts)
        }
        Err(e) => {
            skip_stat(&mut summary, "Value counts", &e);
            None
        }
    };

    print_section(&format!(
        "Average {} by {} and {}",
        PIVOT_VALUE, PIVOT_ROW_KEY, PIVOT_COLUMN_KEY
    ));
    let pivot = match grouped_mean_pivot(&df, PIVOT_ROW_KEY, PIVOT_COLUMN_KEY, PIVOT_VALUE) {
        Ok(pivot) => {
            print_table(&pivot_table(&pivot));
            summary.record_stat();
            Some(pivot)
        }
        Err(e) => {
            skip_stat(&mut summary, "Pivot table", &e);
            None
        }
    };

    print_section(&format!("Pearson correlation with {}", PEARSON_TARGET));
    let mut pearson = Vec::new();
    let mut pearson_skipped = Vec::new();
    for column in PEARSON_COLUMNS {
        match pearson_with_p_value(&df, column, PEARSON_TARGET) {
            Ok(result) => {
                summary.record_stat();
                pearson.push(result);
            }
            Err(e) => {
                skip_stat(&mut summary, &format!("Pearson {} vs {}", column, PEARSON_TARGET), &e);
                pearson_skipped.push((column.to_string(), PEARSON_TARGET.to_string(), e.to_string()));
            }
        }
    }
    if !pearson.is_empty() {
        print_table(&pearson_table(&pearson));
    }

    let stats_elapsed = step_start.elapsed();
    summary.record_timing("Statistics", stats_elapsed);
    print_step_time(stats_elapsed);

    // Step 3: Charts
    let mut written_charts: Vec<String> = Vec::new();
    if let Some(dir) = cli.chart_dir() {
        step += 1;
        print_step_header(step, "Charts");

        let step_start = Instant::now();
        let mut specs = Vec::new();
        for plan in plan_charts(&df, pivot.as_ref()) {
            match plan {
                Ok(spec) => specs.push(spec),
                Err(skipped) => {
                    print_skipped(&skipped.title, &skipped.reason.to_string());
                    summary.skip_chart(skipped.title);
                }
            }
        }

        match ensure_output_dir(dir) {
            Ok(()) => {
                for (spec, result) in specs.iter().zip(render_all(&specs, dir)) {
                    match result {
                        Ok(path) => {
                            print_success(&format!("{} → {}", spec.title, path.display()));
                            summary.record_chart();
                            written_charts.push(path.display().to_string());
                        }
                        Err(e) => {
                            print_skipped(&spec.title, &e.to_string());
                            summary.skip_chart(spec.title.clone());
                        }
                    }
                }
            }
            Err(e) => {
                print_skipped("Charts", &e.to_string());
                for spec in &specs {
                    summary.skip_chart(spec.title.clone());
                }
            }
        }

        let chart_elapsed = step_start.elapsed();
        summary.record_timing("Charts", chart_elapsed);
        print_step_time(chart_elapsed);
    } else {
        println!();
        print_info("Chart rendering disabled (--no-charts)");
    }

    // Step 4: Optional JSON report
    if let Some(report_path) = &cli.report {
        step += 1;
        print_step_header(step, "JSON Report");

        let inputs = ReportInputs {
            source: &cli.input,
            rows,
            columns: cols,
            cleaning: &cleaning,
            correlation: correlation.as_ref(),
            numeric_summary: &numeric_summary,
            categorical_summary: &categorical_summary,
            value_counts: counts
                .as_deref()
                .map(|counts| (VALUE_COUNTS_COLUMN, counts)),
            pivot: pivot.as_ref(),
            pearson: &pearson,
            pearson_skipped: &pearson_skipped,
            charts: &written_charts,
        };

        match export_report(&inputs, report_path) {
            Ok(()) => print_success(&format!("Report written to {}", report_path.display())),
            Err(e) => print_skipped("JSON report", &format!("{:#}", e)),
        }
    }

    summary.display();
    print_completion();

    Ok(())
}

/// Report a statistic that could not be computed and move on
fn skip_stat(summary: &mut EdaSummary, what: &str, err: &StatsError) {
    if !err.is_skippable() {
        error!("{} failed unexpectedly: {:?}", what, err);
    }
    print_skipped(what, &err.to_string());
    summary.skip_stat(format!("{}: {}", what, err));
}
