//! End-of-run summary

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// Counters and timings collected while the pipeline runs
#[derive(Debug, Default)]
pub struct EdaSummary {
    pub rows: usize,
    pub columns: usize,
    pub sentinels_replaced: usize,
    pub stats_computed: usize,
    pub stats_skipped: Vec<String>,
    pub charts_written: usize,
    pub charts_skipped: Vec<String>,
    pub timings: Vec<(String, Duration)>,
}

impl EdaSummary {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            ..Default::default()
        }
    }

    pub fn record_stat(&mut self) {
        self.stats_computed += 1;
    }

    pub fn skip_stat(&mut self, what: impl Into<String>) {
        self.stats_skipped.push(what.into());
    }

    pub fn record_chart(&mut self) {
        self.charts_written += 1;
    }

    pub fn skip_chart(&mut self, title: impl Into<String>) {
        self.charts_skipped.push(title.into());
    }

    pub fn record_timing(&mut self, stage: impl Into<String>, elapsed: Duration) {
        self.timings.push((stage.into(), elapsed));
    }

    pub fn total_time(&self) -> Duration {
        self.timings.iter().map(|(_, d)| *d).sum()
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Rows"), Cell::new(self.rows)]);
        table.add_row(vec![Cell::new("🧱 Columns"), Cell::new(self.columns)]);
        table.add_row(vec![
            Cell::new("🧹 Sentinels replaced"),
            Cell::new(self.sentinels_replaced),
        ]);
        table.add_row(vec![
            Cell::new("✅ Statistics computed"),
            Cell::new(self.stats_computed).fg(Color::Green),
        ]);
        table.add_row(vec![
            Cell::new("⏭️  Statistics skipped"),
            Cell::new(self.stats_skipped.len()).fg(if self.stats_skipped.is_empty() {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        table.add_row(vec![
            Cell::new("📊 Charts written"),
            Cell::new(self.charts_written).fg(Color::Green),
        ]);
        table.add_row(vec![
            Cell::new("⏭️  Charts skipped"),
            Cell::new(self.charts_skipped.len()).fg(if self.charts_skipped.is_empty() {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);

        for (stage, elapsed) in &self.timings {
            table.add_row(vec![
                Cell::new(format!("⏱️  {}", stage)),
                Cell::new(format!("{:.2}s", elapsed.as_secs_f64())),
            ]);
        }
        table.add_row(vec![
            Cell::new("⏱️  Total"),
            Cell::new(format!("{:.2}s", self.total_time().as_secs_f64()))
                .add_attribute(Attribute::Bold),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.stats_skipped.is_empty() || !self.charts_skipped.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("📝").cyan(),
                style("SKIPPED").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());

            for (heading, items) in [
                ("Statistics", &self.stats_skipped),
                ("Charts", &self.charts_skipped),
            ] {
                if items.is_empty() {
                    continue;
                }
                println!();
                println!(
                    "      {} {}:",
                    style(heading).yellow(),
                    style(format!("({})", items.len())).dim()
                );
                for item in items {
                    println!("        {} {}", style("•").dim(), item);
                }
            }
        }
    }
}
