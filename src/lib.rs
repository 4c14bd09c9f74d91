//! Transfer Bench
//!
//! Benchmarking harness that compares the upload throughput of two versions
//! of a batch-capable file-transfer CLI. Each iteration writes batch-command
//! manifests for a payload directory, runs both executables against them,
//! times the runs, and the collected series are summarized at the end.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod experiment;
pub mod logging;
pub mod manifest;
pub mod models;
pub mod output;
pub mod random;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, DurationSeries, IterationRecord, Statistics};
pub use executor::{CommandRunner, Invocation, ProcessRunner};
pub use experiment::{Experiment, ExperimentOutcome, ExperimentPlan, Phase};
pub use logging::{Logger, LoggerFactory};
pub use manifest::{build_manifest, FixedDestination, LineTemplate, ManifestSummary, RandomPairedDestination};
pub use random::{generate_token, RandomSource, SeededRandom};
pub use stats::{summarize, Comparison, ExperimentStatistics};
pub use output::{BenchmarkReport, ColoredFormatter, OutputFormatterFactory, PlainFormatter, ReportFormatter};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    pub const DEFAULT_SOURCE_DIR: &str = "./blob";
    pub const DEFAULT_ITERATIONS: u32 = 3;
    pub const DEFAULT_BASELINE_BIN: &str = "./s5cmd_v1.0.0";
    pub const DEFAULT_CANDIDATE_BIN: &str = "./s5cmd";
    pub const DEFAULT_BUCKETS: &[&str] = &["s3://bucket-faru-1", "s3://bucket-faru-2"];
    pub const DEFAULT_REGIONS: &[&str] = &["us-east-1", "us-east-2"];
    pub const DEFAULT_MANIFEST_DIR: &str = ".";
    pub const BASELINE_MANIFEST: &str = "commands.txt";
    pub const CANDIDATE_MANIFEST: &str = "commandsWithRegion.txt";
    pub const DEFAULT_TOKEN_LENGTH: usize = 8;
    pub const DEFAULT_REGION_ENV_VAR: &str = "AWS_DEFAULT_REGION";
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
