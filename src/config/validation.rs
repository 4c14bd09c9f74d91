//! Configuration validation utilities and rules

use crate::{
    error::Result,
    models::Config,
    types::CleanupPolicy,
};
use colored::Colorize;

/// Configuration validator with advisory checks on top of `Config::validate`
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration with comprehensive checks
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        // Hard errors first
        config.validate()?;

        warnings.extend(Self::validate_sampling(config));
        warnings.extend(Self::validate_executables(config));
        warnings.extend(Self::validate_topology(config));
        warnings.extend(Self::validate_cleanup(config));

        Ok(warnings)
    }

    fn validate_sampling(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.iterations < 3 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Only {} iteration(s) configured; the standard deviation will say little",
                    config.iterations
                ),
            ));
        }

        if config.token_length < 6 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Token length {} makes prefix collisions between iterations likely",
                    config.token_length
                ),
            ));
        }

        warnings
    }

    fn validate_executables(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.baseline_bin == config.candidate_bin {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Baseline and candidate use the same executable '{}'",
                    config.baseline_bin.display()
                ),
            ));
        }

        for (label, path) in [("Baseline", &config.baseline_bin), ("Candidate", &config.candidate_bin)] {
            if !path.exists() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("{} executable '{}' not found relative to the working directory", label, path.display()),
                ));
            }
        }

        warnings
    }

    fn validate_topology(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let pairs = config.destination_pairs();

        if pairs.len() == 1 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "Only one destination pair; the candidate will not spread uploads across regions".to_string(),
            ));
        }

        let baseline_bucket = config.baseline_bucket();
        if !pairs.iter().any(|pair| pair.bucket == baseline_bucket) {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Baseline bucket '{}' is not one of the candidate buckets", baseline_bucket),
            ));
        }

        warnings
    }

    fn validate_cleanup(config: &Config) -> Vec<ValidationWarning> {
        if config.cleanup_policy == CleanupPolicy::Skip {
            vec![ValidationWarning::new(
                ValidationLevel::Warning,
                "Cleanup is disabled; uploaded objects will remain in the buckets".to_string(),
            )]
        } else {
            Vec::new()
        }
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Get color for terminal display
    pub fn color(&self) -> &'static str {
        match self {
            Self::Info => "blue",
            Self::Warning => "yellow",
            Self::Error => "red",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        if use_color {
            format!("{} {}", tag.color(self.level.color()).bold(), self.message)
        } else {
            format!("{} {}", tag, self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn messages(config: &Config) -> Vec<String> {
        validate_config(config)
            .unwrap()
            .into_iter()
            .map(|w| w.message)
            .collect()
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let config = Config { iterations: 0, ..Config::default() };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_default_config_has_no_warnings_beyond_missing_binaries() {
        let warnings = validate_config(&Config::default()).unwrap();
        assert!(warnings.iter().all(|w| w.level == ValidationLevel::Info));
        assert!(warnings.iter().all(|w| w.message.contains("not found")));
    }

    #[test]
    fn test_few_iterations_warns() {
        let config = Config { iterations: 2, ..Config::default() };
        assert!(messages(&config).iter().any(|m| m.contains("2 iteration(s)")));
    }

    #[test]
    fn test_identical_binaries_warn() {
        let config = Config {
            baseline_bin: PathBuf::from("./s5cmd"),
            candidate_bin: PathBuf::from("./s5cmd"),
            ..Config::default()
        };
        assert!(messages(&config).iter().any(|m| m.contains("same executable")));
    }

    #[test]
    fn test_single_pair_and_foreign_baseline_bucket() {
        let config = Config {
            baseline_bucket: Some("s3://elsewhere".to_string()),
            buckets: vec!["s3://only".to_string()],
            regions: vec!["eu-west-1".to_string()],
            ..Config::default()
        };
        let found = messages(&config);
        assert!(found.iter().any(|m| m.contains("Only one destination pair")));
        assert!(found.iter().any(|m| m.contains("s3://elsewhere")));
    }

    #[test]
    fn test_skip_cleanup_and_short_token_warn() {
        let config = Config {
            cleanup_policy: CleanupPolicy::Skip,
            token_length: 4,
            ..Config::default()
        };
        let warnings = validate_config(&config).unwrap();
        let levels: Vec<_> = warnings
            .iter()
            .filter(|w| w.level == ValidationLevel::Warning)
            .map(|w| w.message.as_str())
            .collect();
        assert!(levels.iter().any(|m| m.contains("Cleanup is disabled")));
        assert!(levels.iter().any(|m| m.contains("Token length 4")));
    }

    #[test]
    fn test_warning_format() {
        let warning = ValidationWarning::new(ValidationLevel::Warning, "careful".to_string());
        assert_eq!(warning.format(false), "[WARNING] careful");
        assert!(warning.format(true).contains("careful"));
    }
}
