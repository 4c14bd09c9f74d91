//! Command-line interface

use crate::types::CleanupPolicy;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Transfer Bench - compare upload throughput of two transfer tool versions
#[derive(Parser, Debug, Clone)]
#[command(name = "tbench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Payload directory; every file below it is uploaded once per variant
    #[arg(short, long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Number of measured iterations
    #[arg(short = 'n', long)]
    pub iterations: Option<u32>,

    /// Baseline executable (uploads everything to one bucket)
    #[arg(long, value_name = "PATH")]
    pub baseline_bin: Option<PathBuf>,

    /// Candidate executable (uploads to randomly chosen bucket/region pairs)
    #[arg(long, value_name = "PATH")]
    pub candidate_bin: Option<PathBuf>,

    /// Bucket used by the baseline (defaults to the first of --buckets)
    #[arg(long, value_name = "URI")]
    pub baseline_bucket: Option<String>,

    /// Candidate buckets (comma-separated), paired with --regions by position
    #[arg(long, value_name = "URIS")]
    pub buckets: Option<String>,

    /// Candidate regions (comma-separated)
    #[arg(long, value_name = "REGIONS")]
    pub regions: Option<String>,

    /// Directory the batch manifests are written to
    #[arg(long, value_name = "DIR")]
    pub manifest_dir: Option<PathBuf>,

    /// Length of the random path prefixes
    #[arg(long)]
    pub token_length: Option<usize>,

    /// What to do when deleting uploaded objects fails
    #[arg(long = "cleanup", value_name = "POLICY", value_parser = parse_cleanup_policy)]
    pub cleanup_policy: Option<CleanupPolicy>,

    /// Environment variable carrying the region to delete commands
    #[arg(long, value_name = "NAME")]
    pub region_env_var: Option<String>,

    /// Seed for the random source instead of the clock
    #[arg(long)]
    pub seed: Option<u64>,

    /// Discard the transfer tool's own output
    #[arg(short, long)]
    pub quiet: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output (per-iteration table)
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// List supported environment variables and exit
    #[arg(long)]
    pub env_help: bool,
}

fn parse_cleanup_policy(value: &str) -> Result<CleanupPolicy, String> {
    value.parse::<CleanupPolicy>().map_err(|e| e.to_string())
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if let Some(0) = self.iterations {
            return Err("--iterations must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }
}

/// Color support detection honoring NO_COLOR and non-terminal stdout
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("TERM").as_deref(), Ok("dumb")) {
        return false;
    }
    std::io::stdout().is_terminal()
}
