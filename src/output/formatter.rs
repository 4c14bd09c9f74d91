//! Core formatting traits and implementations
//!
//! This module defines the report formatting interface and provides
//! a plain text implementation with table formatting capabilities.

use super::BenchmarkReport;
use crate::{
    error::{AppError, Result},
    models::metrics::{IterationRecord, Statistics},
    stats::Comparison,
    types::Variant,
};
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

/// Main trait for report formatting
pub trait ReportFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the summary block of one variant
    fn format_variant(&self, variant: Variant, executable: &Path, stats: &Statistics) -> Result<String>;

    /// Format the head-to-head comparison line
    fn format_comparison(&self, comparison: &Comparison) -> Result<String>;

    /// Format the per-iteration table
    fn format_iteration_table(&self, records: &[IterationRecord]) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Whether the per-iteration table is included
    fn is_verbose(&self) -> bool;

    /// Format the complete report
    fn format_report(&self, report: &BenchmarkReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("Transfer Benchmark Results")?);
        output.push_str("\n\n");

        output.push_str(&format!("Run:        {}\n", report.run_id));
        output.push_str(&format!("Iterations: {}\n\n", report.statistics.baseline.sample_count));

        output.push_str(&self.format_variant(
            Variant::Baseline,
            &report.baseline_bin,
            &report.statistics.baseline,
        )?);
        output.push('\n');
        output.push_str(&self.format_variant(
            Variant::Candidate,
            &report.candidate_bin,
            &report.statistics.candidate,
        )?);
        output.push('\n');

        output.push_str(&self.format_comparison(&report.statistics.comparison)?);
        output.push('\n');

        if self.is_verbose() && !report.records.is_empty() {
            output.push('\n');
            output.push_str(&self.format_iteration_table(&report.records)?);
            output.push('\n');
        }

        for failure in &report.cleanup_failures {
            output.push('\n');
            output.push_str(&self.format_warning(&format!("Cleanup failed: {}", failure))?);
        }
        if !report.cleanup_failures.is_empty() {
            output.push('\n');
        }

        Ok(output)
    }
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Include the per-iteration table
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
        }
    }
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    /// Column header
    pub header: String,
    /// Column alignment
    pub alignment: Alignment,
    /// Minimum width
    pub min_width: usize,
}

impl Column {
    pub fn new(header: &str, alignment: Alignment, min_width: usize) -> Self {
        Self {
            header: header.to_string(),
            alignment,
            min_width,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone, Copy)]
pub enum Alignment {
    Left,
    Right,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Columns of the per-iteration table
pub(crate) fn iteration_columns() -> Vec<Column> {
    vec![
        Column::new("#", Alignment::Right, 2),
        Column::new("Baseline prefix", Alignment::Left, 10),
        Column::new("Baseline", Alignment::Right, 8),
        Column::new("Candidate prefix", Alignment::Left, 10),
        Column::new("Candidate", Alignment::Right, 8),
        Column::new("Files", Alignment::Right, 5),
    ]
}

/// Rows of the per-iteration table, one per completed iteration
pub(crate) fn iteration_rows(records: &[IterationRecord]) -> Vec<RowData> {
    records
        .iter()
        .filter_map(|record| {
            let (baseline, candidate) = record.durations()?;
            Some(vec![
                (record.index + 1).to_string(),
                record.baseline_prefix.clone(),
                format_duration(baseline),
                record.candidate_prefix.clone(),
                format_duration(candidate),
                record.baseline_files.to_string(),
            ])
        })
        .collect()
}

/// Format duration in seconds with millisecond precision
pub(crate) fn format_duration(duration: Duration) -> String {
    format!("{:.3}s", duration.as_secs_f64())
}

/// Format the speedup factor, or a dash when undefined
pub(crate) fn format_speedup(speedup: Option<f64>) -> String {
    match speedup {
        Some(factor) => format!("{:.2}x", factor),
        None => "n/a".to_string(),
    }
}

fn fmt_err(e: std::fmt::Error) -> AppError {
    AppError::internal(format!("Failed to format report: {}", e))
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    /// Create a table with the given columns and data
    pub(crate) fn create_table(&self, columns: &[Column], rows: &[RowData]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let widths = Self::calculate_column_widths(columns, rows);
        let borders = self.options.table_borders;
        let mut lines = Vec::new();

        if borders {
            lines.push(Self::create_horizontal_border(&widths));
        }
        let headers: Vec<String> = columns.iter().map(|c| c.header.clone()).collect();
        lines.push(Self::create_row(&headers, &widths, columns, borders));
        if borders {
            lines.push(Self::create_horizontal_border(&widths));
        }

        for row in rows {
            lines.push(Self::create_row(row, &widths, columns, borders));
        }

        if borders {
            lines.push(Self::create_horizontal_border(&widths));
        }

        lines.join("\n")
    }

    /// Calculate column widths from headers and content
    fn calculate_column_widths(columns: &[Column], rows: &[RowData]) -> Vec<usize> {
        columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                rows.iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .fold(column.min_width.max(column.header.len()), usize::max)
            })
            .collect()
    }

    /// Create a table row
    fn create_row(data: &[String], widths: &[usize], columns: &[Column], borders: bool) -> String {
        let mut row = String::new();

        if borders {
            row.push('|');
        }

        for ((cell, &width), column) in data.iter().zip(widths).zip(columns) {
            let padded = Self::align_text(cell, width, column.alignment);
            if borders {
                row.push(' ');
                row.push_str(&padded);
                row.push_str(" |");
            } else {
                row.push_str(&padded);
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    /// Create horizontal border for table
    fn create_horizontal_border(widths: &[usize]) -> String {
        let mut border = String::from("+");
        for &width in widths {
            border.push_str(&"-".repeat(width + 2));
            border.push('+');
        }
        border
    }

    /// Align text within specified width
    fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
        match alignment {
            Alignment::Left => format!("{:<width$}", text, width = width),
            Alignment::Right => format!("{:>width$}", text, width = width),
        }
    }
}

impl ReportFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.len() + 4);

        writeln!(output, "{}", border).map_err(fmt_err)?;
        writeln!(output, "  {}  ", title).map_err(fmt_err)?;
        write!(output, "{}", border).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_variant(&self, variant: Variant, executable: &Path, stats: &Statistics) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "{} ({})", variant, executable.display()).map_err(fmt_err)?;
        writeln!(output, "  Mean:    {:.3}s", stats.mean_secs).map_err(fmt_err)?;
        writeln!(output, "  Std dev: {:.3}s", stats.std_dev_secs).map_err(fmt_err)?;
        writeln!(
            output,
            "  Min/Max: {:.3}s / {:.3}s over {} run(s)",
            stats.min_secs, stats.max_secs, stats.sample_count
        )
        .map_err(fmt_err)?;

        Ok(output)
    }

    fn format_comparison(&self, comparison: &Comparison) -> Result<String> {
        let verdict = if comparison.candidate_is_faster() {
            "candidate faster"
        } else if comparison.mean_delta_secs > 0.0 {
            "candidate slower"
        } else {
            "no difference"
        };

        Ok(format!(
            "Comparison: {:+.3}s mean delta, speedup {} ({})",
            comparison.mean_delta_secs,
            format_speedup(comparison.speedup),
            verdict
        ))
    }

    fn format_iteration_table(&self, records: &[IterationRecord]) -> Result<String> {
        let mut output = String::from("Iterations:\n");
        output.push_str(&self.create_table(&iteration_columns(), &iteration_rows(records)));
        Ok(output)
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn is_verbose(&self) -> bool {
        self.options.verbose_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ExperimentStatistics;
    use crate::models::metrics::DurationSeries;
    use std::path::PathBuf;

    fn options(verbose: bool) -> FormattingOptions {
        FormattingOptions {
            enable_color: false,
            verbose_mode: verbose,
            table_borders: true,
        }
    }

    fn sample_report() -> BenchmarkReport {
        let mut records = Vec::new();
        let mut baseline = DurationSeries::new("baseline");
        let mut candidate = DurationSeries::new("candidate");
        for (index, (b, c)) in [(2000u64, 1000u64), (4000, 1000)].into_iter().enumerate() {
            let mut record = IterationRecord::new(index as u32, format!("run/b{}", index), format!("run/c{}", index));
            record.record(Variant::Baseline, Duration::from_millis(b), 3);
            record.record(Variant::Candidate, Duration::from_millis(c), 3);
            baseline.push(Duration::from_millis(b));
            candidate.push(Duration::from_millis(c));
            records.push(record);
        }

        BenchmarkReport {
            run_id: "run".to_string(),
            baseline_bin: PathBuf::from("./old"),
            candidate_bin: PathBuf::from("./new"),
            statistics: ExperimentStatistics::from_series(&baseline, &candidate).unwrap(),
            records,
            cleanup_failures: Vec::new(),
        }
    }

    #[test]
    fn test_report_names_both_variants() {
        let formatter = PlainFormatter::new(options(false));
        let text = formatter.format_report(&sample_report()).unwrap();

        assert!(text.contains("baseline (./old)"));
        assert!(text.contains("candidate (./new)"));
        assert!(text.contains("Mean:    3.000s"));
        assert!(text.contains("Mean:    1.000s"));
        assert!(text.contains("speedup 3.00x (candidate faster)"));
        assert!(!text.contains("Iterations:\n"));
    }

    #[test]
    fn test_verbose_report_has_iteration_table() {
        let formatter = PlainFormatter::new(options(true));
        let text = formatter.format_report(&sample_report()).unwrap();

        assert!(text.contains("Iterations:\n"));
        assert!(text.contains("run/b1"));
        assert!(text.contains("4.000s"));
    }

    #[test]
    fn test_cleanup_failures_are_listed() {
        let mut report = sample_report();
        report.cleanup_failures.push("s3://bucket: exit status 1".to_string());
        let text = PlainFormatter::new(options(false)).format_report(&report).unwrap();
        assert!(text.contains("WARNING: Cleanup failed: s3://bucket: exit status 1"));
    }

    #[test]
    fn test_table_alignment() {
        let formatter = PlainFormatter::new(options(false));
        let columns = vec![
            Column::new("Name", Alignment::Left, 0),
            Column::new("Value", Alignment::Right, 0),
        ];
        let table = formatter.create_table(&columns, &[vec!["a".into(), "1".into()]]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "+------+-------+");
        assert_eq!(lines[1], "| Name | Value |");
        assert_eq!(lines[3], "| a    |     1 |");
    }

    #[test]
    fn test_speedup_formatting() {
        assert_eq!(format_speedup(Some(1.5)), "1.50x");
        assert_eq!(format_speedup(None), "n/a");
    }
}
