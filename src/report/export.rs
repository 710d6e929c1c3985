//! JSON export of the computed summaries

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{
    CategoricalSummary, CleaningReport, CorrelationMatrix, NumericSummary, PearsonResult,
    PivotTable,
};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub autoeda_version: String,
    /// URL or path the dataset was loaded from
    pub source: String,
    pub rows: usize,
    pub columns: usize,
}

/// Correlation matrix with undefined coefficients as `null`
#[derive(Serialize)]
pub struct CorrelationExport {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<f64>>>,
}

impl From<&CorrelationMatrix> for CorrelationExport {
    fn from(matrix: &CorrelationMatrix) -> Self {
        Self {
            columns: matrix.columns.clone(),
            rows: matrix
                .rows()
                .into_iter()
                .map(|row| row.into_iter().map(|r| r.is_finite().then_some(r)).collect())
                .collect(),
        }
    }
}

#[derive(Serialize)]
pub struct ValueCountEntry {
    pub value: String,
    pub count: usize,
}

#[derive(Serialize)]
pub struct ValueCountsExport {
    pub column: String,
    pub counts: Vec<ValueCountEntry>,
}

/// A Pearson test that was not run
#[derive(Serialize)]
pub struct SkippedPearson {
    pub column: String,
    pub against: String,
    pub reason: String,
}

#[derive(Serialize)]
pub struct PearsonExport {
    pub computed: Vec<PearsonResult>,
    pub skipped: Vec<SkippedPearson>,
}

/// Complete report document
#[derive(Serialize)]
pub struct EdaReport<'a> {
    pub metadata: ReportMetadata,
    pub cleaning: &'a CleaningReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<CorrelationExport>,
    pub numeric_summary: &'a [NumericSummary],
    pub categorical_summary: &'a [CategoricalSummary],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_counts: Option<ValueCountsExport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pivot: Option<&'a PivotTable>,
    pub pearson: PearsonExport,
    pub charts: Vec<String>,
}

/// Everything the report is built from
pub struct ReportInputs<'a> {
    pub source: &'a str,
    pub rows: usize,
    pub columns: usize,
    pub cleaning: &'a CleaningReport,
    pub correlation: Option<&'a CorrelationMatrix>,
    pub numeric_summary: &'a [NumericSummary],
    pub categorical_summary: &'a [CategoricalSummary],
    /// Column name and its counts
    pub value_counts: Option<(&'a str, &'a [(String, usize)])>,
    pub pivot: Option<&'a PivotTable>,
    pub pearson: &'a [PearsonResult],
    /// `(column, against, reason)` for each test that was not run
    pub pearson_skipped: &'a [(String, String, String)],
    pub charts: &'a [String],
}

/// Assemble the report document
pub fn build_report<'a>(inputs: &ReportInputs<'a>) -> EdaReport<'a> {
    EdaReport {
        metadata: ReportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            autoeda_version: env!("CARGO_PKG_VERSION").to_string(),
            source: inputs.source.to_string(),
            rows: inputs.rows,
            columns: inputs.columns,
        },
        cleaning: inputs.cleaning,
        correlation: inputs.correlation.map(CorrelationExport::from),
        numeric_summary: inputs.numeric_summary,
        categorical_summary: inputs.categorical_summary,
        value_counts: inputs.value_counts.map(|(column, counts)| ValueCountsExport {
            column: column.to_string(),
            counts: counts
                .iter()
                .map(|(value, count)| ValueCountEntry {
                    value: value.clone(),
                    count: *count,
                })
                .collect(),
        }),
        pivot: inputs.pivot,
        pearson: PearsonExport {
            computed: inputs.pearson.to_vec(),
            skipped: inputs
                .pearson_skipped
                .iter()
                .map(|(column, against, reason)| SkippedPearson {
                    column: column.clone(),
                    against: against.clone(),
                    reason: reason.clone(),
                })
                .collect(),
        },
        charts: inputs.charts.to_vec(),
    }
}

/// Write the report as pretty-printed JSON
pub fn export_report(inputs: &ReportInputs, output_path: &Path) -> Result<()> {
    let report = build_report(inputs);

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    Ok(())
}
