//! Configuration data model and validation

use crate::defaults;
use crate::types::{split_list, AppError, CleanupPolicy, DestinationPair, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Payload directory whose files are uploaded
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Number of measured iterations
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Executable of the baseline variant
    #[serde(default = "default_baseline_bin")]
    pub baseline_bin: PathBuf,

    /// Executable of the candidate variant
    #[serde(default = "default_candidate_bin")]
    pub candidate_bin: PathBuf,

    /// Bucket the baseline uploads everything to; first bucket when unset
    #[serde(default)]
    pub baseline_bucket: Option<String>,

    /// Buckets the candidate picks from, paired by position with `regions`
    #[serde(default = "default_buckets")]
    pub buckets: Vec<String>,

    /// Regions of `buckets`
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,

    /// Directory the manifests are written to
    #[serde(default = "default_manifest_dir")]
    pub manifest_dir: PathBuf,

    /// Length of random path-prefix tokens
    #[serde(default = "default_token_length")]
    pub token_length: usize,

    /// Handling of failed bulk deletes
    #[serde(default)]
    pub cleanup_policy: CleanupPolicy,

    /// Variable carrying the region to region-scoped delete commands
    #[serde(default = "default_region_env_var")]
    pub region_env_var: String,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            iterations: default_iterations(),
            baseline_bin: default_baseline_bin(),
            candidate_bin: default_candidate_bin(),
            baseline_bucket: None,
            buckets: default_buckets(),
            regions: default_regions(),
            manifest_dir: default_manifest_dir(),
            token_length: default_token_length(),
            cleanup_policy: CleanupPolicy::default(),
            region_env_var: default_region_env_var(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket targeted by the baseline variant
    pub fn baseline_bucket(&self) -> String {
        self.baseline_bucket
            .clone()
            .or_else(|| self.buckets.first().cloned())
            .unwrap_or_default()
    }

    /// Bucket/region pairs the candidate variant draws from
    pub fn destination_pairs(&self) -> Vec<DestinationPair> {
        self.buckets
            .iter()
            .zip(self.regions.iter())
            .map(|(bucket, region)| DestinationPair::new(bucket.clone(), region.clone()))
            .collect()
    }

    /// Manifest path of the baseline variant
    pub fn baseline_manifest(&self) -> PathBuf {
        self.manifest_dir.join(defaults::BASELINE_MANIFEST)
    }

    /// Manifest path of the candidate variant
    pub fn candidate_manifest(&self) -> PathBuf {
        self.manifest_dir.join(defaults::CANDIDATE_MANIFEST)
    }

    /// Validate the configuration and return the first error
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(AppError::config("Iteration count must be greater than 0"));
        }

        if self.iterations > 1000 {
            return Err(AppError::config("Iteration count cannot exceed 1000"));
        }

        if !(4..=64).contains(&self.token_length) {
            return Err(AppError::config(format!(
                "Token length must be between 4 and 64, got {}",
                self.token_length
            )));
        }

        if self.source_dir.as_os_str().is_empty() {
            return Err(AppError::config("Source directory cannot be empty"));
        }

        if self.baseline_bin.as_os_str().is_empty() || self.candidate_bin.as_os_str().is_empty() {
            return Err(AppError::config("Executable paths cannot be empty"));
        }

        if self.buckets.is_empty() {
            return Err(AppError::config("At least one bucket is required"));
        }

        if self.buckets.len() != self.regions.len() {
            return Err(AppError::config(format!(
                "Buckets and regions must pair up: {} bucket(s), {} region(s)",
                self.buckets.len(),
                self.regions.len()
            )));
        }

        for bucket in &self.buckets {
            validate_bucket_uri(bucket)?;
        }

        for region in &self.regions {
            if region.trim().is_empty() || region.contains(char::is_whitespace) {
                return Err(AppError::config(format!("Invalid region '{}'", region)));
            }
        }

        if let Some(bucket) = &self.baseline_bucket {
            validate_bucket_uri(bucket)?;
        }

        if self.region_env_var.is_empty() || self.region_env_var.contains('=') {
            return Err(AppError::config(format!(
                "Invalid region variable name '{}'",
                self.region_env_var
            )));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(source_dir) = std::env::var("SOURCE_DIR") {
            self.source_dir = PathBuf::from(source_dir);
        }

        if let Ok(iterations) = std::env::var("ITERATIONS") {
            self.iterations = iterations.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ITERATIONS value '{}': {}", iterations, e)))?;
        }

        if let Ok(bin) = std::env::var("BASELINE_BIN") {
            self.baseline_bin = PathBuf::from(bin);
        }

        if let Ok(bin) = std::env::var("CANDIDATE_BIN") {
            self.candidate_bin = PathBuf::from(bin);
        }

        if let Ok(bucket) = std::env::var("BASELINE_BUCKET") {
            let bucket = bucket.trim().to_string();
            self.baseline_bucket = if bucket.is_empty() { None } else { Some(bucket) };
        }

        if let Ok(buckets) = std::env::var("BUCKETS") {
            self.buckets = split_list(&buckets);
        }

        if let Ok(regions) = std::env::var("REGIONS") {
            self.regions = split_list(&regions);
        }

        if let Ok(dir) = std::env::var("MANIFEST_DIR") {
            self.manifest_dir = PathBuf::from(dir);
        }

        if let Ok(length) = std::env::var("TOKEN_LENGTH") {
            self.token_length = length.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid TOKEN_LENGTH value '{}': {}", length, e)))?;
        }

        if let Ok(policy) = std::env::var("CLEANUP_POLICY") {
            self.cleanup_policy = policy.parse()
                .map_err(|e| AppError::config(format!("Invalid CLEANUP_POLICY value: {}", e)))?;
        }

        if let Ok(var) = std::env::var("REGION_ENV_VAR") {
            self.region_env_var = var.trim().to_string();
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

/// Accept `scheme://name[/...]` with a non-empty name and no whitespace
pub fn validate_bucket_uri(bucket: &str) -> Result<()> {
    let valid = match bucket.split_once("://") {
        Some((scheme, rest)) => {
            !scheme.is_empty()
                && !rest.trim_matches('/').is_empty()
                && !bucket.contains(char::is_whitespace)
                && !bucket.contains('*')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(AppError::config(format!(
            "Invalid bucket URI '{}' (expected e.g. s3://bucket-name)",
            bucket
        )))
    }
}

// Default value functions for serde
fn default_source_dir() -> PathBuf {
    PathBuf::from(defaults::DEFAULT_SOURCE_DIR)
}

fn default_iterations() -> u32 {
    defaults::DEFAULT_ITERATIONS
}

fn default_baseline_bin() -> PathBuf {
    PathBuf::from(defaults::DEFAULT_BASELINE_BIN)
}

fn default_candidate_bin() -> PathBuf {
    PathBuf::from(defaults::DEFAULT_CANDIDATE_BIN)
}

fn default_buckets() -> Vec<String> {
    defaults::DEFAULT_BUCKETS.iter().map(|&s| s.to_string()).collect()
}

fn default_regions() -> Vec<String> {
    defaults::DEFAULT_REGIONS.iter().map(|&s| s.to_string()).collect()
}

fn default_manifest_dir() -> PathBuf {
    PathBuf::from(defaults::DEFAULT_MANIFEST_DIR)
}

fn default_token_length() -> usize {
    defaults::DEFAULT_TOKEN_LENGTH
}

fn default_region_env_var() -> String {
    defaults::DEFAULT_REGION_ENV_VAR.to_string()
}

fn default_enable_color() -> bool {
    defaults::DEFAULT_ENABLE_COLOR
}
