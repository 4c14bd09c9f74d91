//! Output formatting and display system
//!
//! Turns a finished experiment into the console report, in plain text or
//! with terminal colors.

mod colored;
mod formatter;

pub use self::colored::{ColorScheme, ColoredFormatter};
pub use formatter::{Alignment, Column, FormattingOptions, PlainFormatter, ReportFormatter, RowData};

use crate::{
    error::Result,
    experiment::{ExperimentOutcome, ExperimentPlan},
    models::metrics::IterationRecord,
    stats::ExperimentStatistics,
};
use std::path::PathBuf;

/// Everything the report shows about one run
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    pub run_id: String,
    pub baseline_bin: PathBuf,
    pub candidate_bin: PathBuf,
    pub statistics: ExperimentStatistics,
    pub records: Vec<IterationRecord>,
    pub cleanup_failures: Vec<String>,
}

impl BenchmarkReport {
    /// Summarize a finished experiment
    pub fn new(plan: &ExperimentPlan, outcome: ExperimentOutcome) -> Result<Self> {
        let statistics = ExperimentStatistics::from_series(&outcome.baseline, &outcome.candidate)?;

        Ok(Self {
            run_id: outcome.run_id,
            baseline_bin: plan.baseline_bin.clone(),
            candidate_bin: plan.candidate_bin.clone(),
            statistics,
            records: outcome.records,
            cleanup_failures: outcome.cleanup_failures,
        })
    }
}

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn ReportFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            table_borders: true,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn ReportFormatter> {
        Self::create_formatter(false, false)
    }
}
