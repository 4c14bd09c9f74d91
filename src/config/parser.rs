//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::Result,
    models::Config,
    types::split_list,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
    read_environment: bool,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli, read_environment: true }
    }

    /// Parser that ignores `.env` and the process environment
    pub fn without_environment(cli: Cli) -> Self {
        Self { cli, read_environment: false }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        // Start with default configuration
        let mut config = Config::default();

        if self.read_environment {
            EnvManager::load_env_file(self.cli.debug)?;
            config.merge_from_env()?;
        }

        // Override with CLI arguments
        self.apply_cli_overrides(&mut config);

        // Validate the final configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        let cli = &self.cli;

        if let Some(ref source) = cli.source {
            config.source_dir = source.clone();
        }
        if let Some(iterations) = cli.iterations {
            config.iterations = iterations;
        }
        if let Some(ref bin) = cli.baseline_bin {
            config.baseline_bin = bin.clone();
        }
        if let Some(ref bin) = cli.candidate_bin {
            config.candidate_bin = bin.clone();
        }
        if let Some(ref bucket) = cli.baseline_bucket {
            config.baseline_bucket = Some(bucket.trim().to_string());
        }
        if let Some(ref buckets) = cli.buckets {
            config.buckets = split_list(buckets);
        }
        if let Some(ref regions) = cli.regions {
            config.regions = split_list(regions);
        }
        if let Some(ref dir) = cli.manifest_dir {
            config.manifest_dir = dir.clone();
        }
        if let Some(length) = cli.token_length {
            config.token_length = length;
        }
        if let Some(policy) = cli.cleanup_policy {
            config.cleanup_policy = policy;
        }
        if let Some(ref var) = cli.region_env_var {
            config.region_env_var = var.clone();
        }

        if cli.color {
            config.enable_color = true;
        } else if cli.no_color {
            config.enable_color = false;
        } else if config.enable_color {
            config.enable_color = crate::cli::supports_color();
        }

        // CLI-only flags
        config.verbose = cli.verbose || cli.debug;
        config.debug = cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Source directory: {}", config.source_dir.display()));
    summary.push(format!("Iterations: {}", config.iterations));
    summary.push(format!("Baseline: {} -> {}", config.baseline_bin.display(), config.baseline_bucket()));
    summary.push(format!("Candidate: {}", config.candidate_bin.display()));
    for pair in config.destination_pairs() {
        summary.push(format!("  {} ({})", pair.bucket, pair.region));
    }
    summary.push(format!("Manifest directory: {}", config.manifest_dir.display()));
    summary.push(format!("Token length: {}", config.token_length));
    summary.push(format!("Cleanup policy: {}", config.cleanup_policy));
    summary.push(format!("Region variable: {}", config.region_env_var));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
