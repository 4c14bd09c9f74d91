//! Summary statistics over the measured duration series

use crate::{
    error::{AppError, Result},
    models::metrics::{DurationSeries, Statistics},
};
use serde::{Deserialize, Serialize};

/// Summarize a duration series
///
/// Mean and sample standard deviation (`n - 1` divisor) in seconds. A single
/// sample has a standard deviation of zero; an empty series is an error.
pub fn summarize(series: &DurationSeries) -> Result<Statistics> {
    if series.is_empty() {
        return Err(AppError::statistics(format!(
            "Cannot summarize empty series '{}'",
            series.name
        )));
    }

    Ok(summarize_secs(&series.as_secs()))
}

/// Summarize a non-empty slice of seconds
fn summarize_secs(values: &[f64]) -> Statistics {
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Statistics {
        mean_secs: mean,
        std_dev_secs: calculate_standard_deviation(values, mean),
        min_secs: min,
        max_secs: max,
        sample_count: count,
    }
}

/// Calculate sample standard deviation
fn calculate_standard_deviation(values: &[f64], mean: f64) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }

    let variance = values.iter()
        .map(|x| (x - mean).powi(2))
        .sum::<f64>() / (values.len() - 1) as f64;

    variance.sqrt()
}

/// Head-to-head comparison of the two variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Candidate mean minus baseline mean; negative means the candidate is faster
    pub mean_delta_secs: f64,

    /// Baseline mean over candidate mean; `None` when the candidate mean is zero
    pub speedup: Option<f64>,
}

impl Comparison {
    pub fn between(baseline: &Statistics, candidate: &Statistics) -> Self {
        let speedup = if candidate.mean_secs > 0.0 {
            Some(baseline.mean_secs / candidate.mean_secs)
        } else {
            None
        };

        Self {
            mean_delta_secs: candidate.mean_secs - baseline.mean_secs,
            speedup,
        }
    }

    /// Whether the candidate finished faster on average
    pub fn candidate_is_faster(&self) -> bool {
        self.mean_delta_secs < 0.0
    }
}

/// Statistics of both variants plus their comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperimentStatistics {
    pub baseline: Statistics,
    pub candidate: Statistics,
    pub comparison: Comparison,
}

impl ExperimentStatistics {
    pub fn from_series(baseline: &DurationSeries, candidate: &DurationSeries) -> Result<Self> {
        let baseline = summarize(baseline)?;
        let candidate = summarize(candidate)?;

        Ok(Self {
            baseline,
            candidate,
            comparison: Comparison::between(&baseline, &candidate),
        })
    }
}
