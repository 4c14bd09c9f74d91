//! Colored formatter implementation with terminal color support

use super::formatter::{
    format_speedup, iteration_columns, iteration_rows, FormattingOptions, PlainFormatter,
    ReportFormatter,
};
use crate::{
    error::Result,
    models::metrics::{IterationRecord, Statistics},
    stats::Comparison,
    types::Variant,
};
use colored::*;
use std::path::Path;

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub baseline: Color,
    pub candidate: Color,
    pub faster: Color,
    pub slower: Color,
    pub warning: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            baseline: Color::Cyan,
            candidate: Color::Magenta,
            faster: Color::Green,
            slower: Color::Red,
            warning: Color::Yellow,
            muted: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        let plain_formatter = PlainFormatter::new(options.clone());
        Self {
            plain_formatter,
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold formatting if colors are enabled
    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    /// Apply dimmed formatting if colors are enabled
    fn dimmed(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.dimmed()
        } else {
            text.normal()
        }
    }

    /// Apply bold color if colors are enabled
    fn emphasize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color).bold()
        } else {
            text.normal()
        }
    }

    fn variant_color(&self, variant: Variant) -> Color {
        match variant {
            Variant::Baseline => self.color_scheme.baseline,
            Variant::Candidate => self.color_scheme.candidate,
        }
    }
}

impl ReportFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let border = "=".repeat(title.len() + 4);
        Ok(format!(
            "{}\n  {}  \n{}",
            self.colorize(&border, self.color_scheme.header),
            self.emphasize(title, self.color_scheme.header),
            self.colorize(&border, self.color_scheme.header)
        ))
    }

    fn format_variant(&self, variant: Variant, executable: &Path, stats: &Statistics) -> Result<String> {
        let name = self.emphasize(variant.name(), self.variant_color(variant));
        let executable = self.dimmed(&format!("({})", executable.display()));

        Ok(format!(
            "{} {}\n  Mean:    {}\n  Std dev: {:.3}s\n  Min/Max: {:.3}s / {:.3}s over {} run(s)\n",
            name,
            executable,
            self.bold(&format!("{:.3}s", stats.mean_secs)),
            stats.std_dev_secs,
            stats.min_secs,
            stats.max_secs,
            stats.sample_count
        ))
    }

    fn format_comparison(&self, comparison: &Comparison) -> Result<String> {
        let (verdict, color) = if comparison.candidate_is_faster() {
            ("candidate faster", self.color_scheme.faster)
        } else if comparison.mean_delta_secs > 0.0 {
            ("candidate slower", self.color_scheme.slower)
        } else {
            ("no difference", self.color_scheme.muted)
        };

        Ok(format!(
            "{} {:+.3}s mean delta, speedup {} ({})",
            self.bold("Comparison:"),
            comparison.mean_delta_secs,
            self.emphasize(&format_speedup(comparison.speedup), color),
            self.colorize(verdict, color)
        ))
    }

    fn format_iteration_table(&self, records: &[IterationRecord]) -> Result<String> {
        let table = self
            .plain_formatter
            .create_table(&iteration_columns(), &iteration_rows(records));

        Ok(format!(
            "{}\n{}",
            self.emphasize("Iterations:", self.color_scheme.header),
            self.colorize(&table, self.color_scheme.muted)
        ))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!(
            "{} {}",
            self.emphasize("WARNING:", self.color_scheme.warning),
            warning
        ))
    }

    fn is_verbose(&self) -> bool {
        self.options.verbose_mode
    }
}
