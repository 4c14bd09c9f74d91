//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Tool variant under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Variant A: every file goes to one fixed bucket
    Baseline,
    /// Variant B: every file goes to a randomly drawn bucket/region pair
    Candidate,
}

impl Variant {
    /// Both variants in execution order
    pub const ALL: [Variant; 2] = [Variant::Baseline, Variant::Candidate];

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Baseline => "baseline",
            Variant::Candidate => "candidate",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A bucket paired with the region it lives in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DestinationPair {
    pub bucket: String,
    pub region: String,
}

impl DestinationPair {
    pub fn new<B: Into<String>, R: Into<String>>(bucket: B, region: R) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
        }
    }
}

/// What to do when a bulk delete fails after the measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupPolicy {
    /// Abort the run; no report is printed
    #[default]
    Fatal,
    /// Log the failure and still print the report
    Warn,
    /// Issue no delete commands at all
    Skip,
}

impl CleanupPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CleanupPolicy::Fatal => "fatal",
            CleanupPolicy::Warn => "warn",
            CleanupPolicy::Skip => "skip",
        }
    }
}

impl fmt::Display for CleanupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CleanupPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fatal" => Ok(CleanupPolicy::Fatal),
            "warn" | "warning" => Ok(CleanupPolicy::Warn),
            "skip" | "none" => Ok(CleanupPolicy::Skip),
            _ => Err(AppError::parse(format!(
                "Invalid cleanup policy '{}' (expected fatal, warn or skip)",
                s
            ))),
        }
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
