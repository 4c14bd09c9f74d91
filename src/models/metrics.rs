//! Iteration records, duration series and summary statistics

use crate::types::Variant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Everything measured in one iteration of the experiment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Zero-based iteration index
    pub index: u32,

    /// Remote prefix used by the baseline upload (`<run_id>/<token>`)
    pub baseline_prefix: String,

    /// Remote prefix used by the candidate upload
    pub candidate_prefix: String,

    /// Baseline wall-clock time, set once its run succeeded
    pub baseline_duration: Option<Duration>,

    /// Candidate wall-clock time, set once its run succeeded
    pub candidate_duration: Option<Duration>,

    /// Files listed in the baseline manifest
    pub baseline_files: usize,

    /// Files listed in the candidate manifest
    pub candidate_files: usize,

    /// When the iteration started
    pub started_at: DateTime<Utc>,
}

impl IterationRecord {
    pub fn new(index: u32, baseline_prefix: String, candidate_prefix: String) -> Self {
        Self {
            index,
            baseline_prefix,
            candidate_prefix,
            baseline_duration: None,
            candidate_duration: None,
            baseline_files: 0,
            candidate_files: 0,
            started_at: Utc::now(),
        }
    }

    /// Prefix used by the given variant
    pub fn prefix(&self, variant: Variant) -> &str {
        match variant {
            Variant::Baseline => &self.baseline_prefix,
            Variant::Candidate => &self.candidate_prefix,
        }
    }

    /// Record a successful run of one variant
    pub fn record(&mut self, variant: Variant, duration: Duration, files: usize) {
        match variant {
            Variant::Baseline => {
                self.baseline_duration = Some(duration);
                self.baseline_files = files;
            }
            Variant::Candidate => {
                self.candidate_duration = Some(duration);
                self.candidate_files = files;
            }
        }
    }

    /// Duration pair, present only when both runs succeeded
    pub fn durations(&self) -> Option<(Duration, Duration)> {
        Some((self.baseline_duration?, self.candidate_duration?))
    }

    pub fn is_complete(&self) -> bool {
        self.durations().is_some()
    }
}

/// Ordered elapsed times of one variant, index-aligned by iteration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationSeries {
    /// Variant or label this series belongs to
    pub name: String,
    samples: Vec<Duration>,
}

impl DurationSeries {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            samples: Vec::new(),
        }
    }

    pub fn with_samples<S: Into<String>>(name: S, samples: Vec<Duration>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }

    pub fn push(&mut self, duration: Duration) {
        self.samples.push(duration);
    }

    pub fn samples(&self) -> &[Duration] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples converted to seconds
    pub fn as_secs(&self) -> Vec<f64> {
        self.samples.iter().map(Duration::as_secs_f64).collect()
    }
}

/// Summary of one duration series, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Arithmetic mean
    pub mean_secs: f64,

    /// Sample standard deviation (n - 1 divisor); 0 for a single sample
    pub std_dev_secs: f64,

    /// Fastest run
    pub min_secs: f64,

    /// Slowest run
    pub max_secs: f64,

    /// Number of samples summarized
    pub sample_count: usize,
}

impl Statistics {
    /// Coefficient of variation, when the mean is positive
    pub fn relative_std_dev(&self) -> Option<f64> {
        if self.mean_secs > 0.0 {
            Some(self.std_dev_secs / self.mean_secs)
        } else {
            None
        }
    }

    /// Format mean ± std dev for display
    pub fn format_mean(&self) -> String {
        format!("{:.3}s ± {:.3}s", self.mean_secs, self.std_dev_secs)
    }
}
