//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::models::config::validate_bucket_uri;
use crate::types::{split_list, CleanupPolicy};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                eprintln!("Loaded configuration from .env file");
            }
        } else if debug {
            eprintln!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Transfer Bench Configuration
#
# Values here are used as defaults and can be overridden by command-line
# arguments.

# Payload directory; every file below it is uploaded once per variant
# SOURCE_DIR=./blob

# Number of measured iterations
# ITERATIONS=3

# Executables under comparison
# BASELINE_BIN=./s5cmd_v1.0.0
# CANDIDATE_BIN=./s5cmd

# Bucket for the baseline (defaults to the first of BUCKETS)
# BASELINE_BUCKET=s3://bucket-faru-1

# Candidate buckets and their regions, paired by position
# BUCKETS=s3://bucket-faru-1,s3://bucket-faru-2
# REGIONS=us-east-1,us-east-2

# Where commands.txt and commandsWithRegion.txt are written
# MANIFEST_DIR=.

# Length of the random path prefixes isolating each iteration
# TOKEN_LENGTH=8

# fatal | warn | skip
# CLEANUP_POLICY=fatal

# Variable handed to region-scoped delete commands
# REGION_ENV_VAR=AWS_DEFAULT_REGION

# Enable colored output (true/false)
# ENABLE_COLOR=true
"#.to_string()
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "ITERATIONS" => {
                let count: u32 = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid ITERATIONS value '{}': {}", value, e)))?;
                if count == 0 || count > 1000 {
                    return Err(AppError::config(format!("ITERATIONS must be between 1 and 1000, got: {}", count)));
                }
            }
            "TOKEN_LENGTH" => {
                let length: usize = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid TOKEN_LENGTH value '{}': {}", value, e)))?;
                if !(4..=64).contains(&length) {
                    return Err(AppError::config(format!("TOKEN_LENGTH must be between 4 and 64, got: {}", length)));
                }
            }
            "BUCKETS" | "BASELINE_BUCKET" => {
                for bucket in split_list(value) {
                    validate_bucket_uri(&bucket)?;
                }
            }
            "REGIONS" => {
                if split_list(value).is_empty() {
                    return Err(AppError::config("REGIONS must list at least one region"));
                }
            }
            "CLEANUP_POLICY" => {
                value.parse::<CleanupPolicy>()
                    .map_err(|e| AppError::config(format!("Invalid CLEANUP_POLICY value: {}", e)))?;
            }
            "ENABLE_COLOR" => {
                value.trim().parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            _ => {
                // Free-form paths and names
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("SOURCE_DIR", "Payload directory to upload", "./blob"),
            ("ITERATIONS", "Number of measured iterations (1-1000)", "3"),
            ("BASELINE_BIN", "Baseline transfer executable", "./s5cmd_v1.0.0"),
            ("CANDIDATE_BIN", "Candidate transfer executable", "./s5cmd"),
            ("BASELINE_BUCKET", "Bucket used by the baseline", "s3://bucket-faru-1"),
            ("BUCKETS", "Comma-separated candidate buckets", "s3://bucket-faru-1,s3://bucket-faru-2"),
            ("REGIONS", "Comma-separated regions paired with BUCKETS", "us-east-1,us-east-2"),
            ("MANIFEST_DIR", "Directory for the batch manifests", "."),
            ("TOKEN_LENGTH", "Random path prefix length (4-64)", "8"),
            ("CLEANUP_POLICY", "fatal, warn or skip", "fatal"),
            ("REGION_ENV_VAR", "Region variable for delete commands", "AWS_DEFAULT_REGION"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<18} {}\n", var, description));
            help.push_str(&format!("  {:<18} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(var_name, _, _)| {
                let value = std::env::var(var_name).ok()?;
                Self::validate_env_var(var_name, &value)
                    .err()
                    .map(|e| format!("Warning: {}", e))
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serializes tests that mutate the process environment
    pub(crate) static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_env_manager_create_example_content() {
        let content = EnvManager::create_example_env_content();

        for (var, _, _) in EnvManager::get_supported_env_vars() {
            assert!(content.contains(&format!("{}=", var)), "example lacks {}", var);
        }
    }

    #[test]
    fn test_env_manager_validate_env_var() {
        assert!(EnvManager::validate_env_var("ITERATIONS", "5").is_ok());
        assert!(EnvManager::validate_env_var("TOKEN_LENGTH", "8").is_ok());
        assert!(EnvManager::validate_env_var("BUCKETS", "s3://a,s3://b").is_ok());
        assert!(EnvManager::validate_env_var("REGIONS", "us-east-1").is_ok());
        assert!(EnvManager::validate_env_var("CLEANUP_POLICY", "warn").is_ok());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "false").is_ok());
        assert!(EnvManager::validate_env_var("SOURCE_DIR", "anything").is_ok());

        assert!(EnvManager::validate_env_var("ITERATIONS", "0").is_err());
        assert!(EnvManager::validate_env_var("ITERATIONS", "1001").is_err());
        assert!(EnvManager::validate_env_var("TOKEN_LENGTH", "2").is_err());
        assert!(EnvManager::validate_env_var("BUCKETS", "no-scheme").is_err());
        assert!(EnvManager::validate_env_var("REGIONS", " , ").is_err());
        assert!(EnvManager::validate_env_var("CLEANUP_POLICY", "eventually").is_err());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "maybe").is_err());
    }

    #[test]
    fn test_display_env_help() {
        let help = EnvManager::display_env_help();

        assert!(help.contains("Supported Environment Variables:"));
        assert!(help.contains("BUCKETS"));
        assert!(help.contains("CLEANUP_POLICY"));
        assert!(help.contains("Configuration Priority"));
    }

    #[test]
    fn test_validate_current_env_reports_bad_values() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        std::env::set_var("TOKEN_LENGTH", "1");
        let warnings = EnvManager::validate_current_env();
        std::env::remove_var("TOKEN_LENGTH");

        assert!(warnings.iter().any(|w| w.contains("TOKEN_LENGTH")));
    }
}
