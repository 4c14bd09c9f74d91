//! Data models and structures for the transfer benchmark

pub mod config;
pub mod metrics;

// Re-export main model types
pub use config::Config;
pub use metrics::{DurationSeries, IterationRecord, Statistics};
