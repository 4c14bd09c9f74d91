//! Structured logging for benchmark runs
//!
//! This module provides:
//! - Structured logging with levels and per-entry fields
//! - Session ids shared by every logger of one run
//! - Timing of iterations and of the whole run
//! - JSON output in debug mode for log aggregators

use crate::error::{AppError, Result};
use crate::models::{Config, IterationRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Detailed information for debugging
    Debug = 1,
    /// Progress of the run
    Info = 2,
    /// Something the user should look at
    Warn = 3,
    /// A failure
    Error = 4,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }

    /// Level implied by the verbosity flags
    pub fn from_config(config: &Config) -> Self {
        if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp when log entry was created
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Additional structured fields, sorted by key
    pub fields: BTreeMap<String, serde_json::Value>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
}

/// Where formatted entries end up
#[derive(Debug, Clone)]
enum LogSink {
    /// Every entry to stderr
    Console,
    /// Kept in memory for inspection
    Memory(Arc<std::sync::Mutex<Vec<LogEntry>>>),
}

/// Shared logging context for correlation and session tracking
#[derive(Debug, Default)]
struct LogContext {
    /// Global correlation ID for the session
    session_id: Option<String>,
    /// Additional context fields
    context_fields: HashMap<String, serde_json::Value>,
}

/// Logger implementation with multiple output formats
#[derive(Debug, Clone)]
pub struct Logger {
    /// Minimum log level to output
    min_level: LogLevel,
    /// Whether to use colored output
    use_color: bool,
    /// Output format
    format: LogFormat,
    /// Logger name
    name: String,
    /// Output destination
    sink: LogSink,
    /// Shared context storage
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: &str) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            format: LogFormat::Console,
            name: name.to_string(),
            sink: LogSink::Console,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger with specific configuration
    pub fn with_config(name: &str, config: &Config) -> Self {
        Self {
            min_level: LogLevel::from_config(config),
            use_color: config.enable_color,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            ..Self::new(name)
        }
    }

    /// Logger that records entries in memory instead of printing them
    pub fn capturing(name: &str, min_level: LogLevel) -> (Self, Arc<std::sync::Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(std::sync::Mutex::new(Vec::new()));
        let logger = Self {
            min_level,
            sink: LogSink::Memory(Arc::clone(&entries)),
            ..Self::new(name)
        };
        (logger, entries)
    }

    /// Logger with another name sharing this one's settings and context
    pub fn child(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self.clone()
        }
    }

    /// Set minimum log level
    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set session correlation ID
    pub async fn set_session_id(&self, session_id: String) {
        let mut context = self.context.write().await;
        context.session_id = Some(session_id);
    }

    /// Add context field for all subsequent log entries
    pub async fn add_context_field<T: Serialize>(&self, key: &str, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            let mut context = self.context.write().await;
            context.context_fields.insert(key.to_string(), json_value);
        }
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Write log entry to output
    async fn write_entry(&self, mut entry: LogEntry) {
        if !self.would_log(entry.level) {
            return;
        }

        let context = self.context.read().await;
        if let Some(session_id) = &context.session_id {
            entry.fields.insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
        }
        for (key, value) in &context.context_fields {
            entry.fields.entry(key.clone()).or_insert_with(|| value.clone());
        }
        drop(context);

        match &self.sink {
            LogSink::Memory(entries) => {
                if let Ok(mut entries) = entries.lock() {
                    entries.push(entry);
                }
            }
            LogSink::Console => {
                let output = match self.format {
                    LogFormat::Console => self.format_console(&entry),
                    LogFormat::Json => self.format_json(&entry),
                };

                // Stdout is reserved for child output and the report
                let _ = writeln!(io::stderr(), "{}", output);
            }
        }
    }

    /// Format log entry for console output
    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}", timestamp, formatted_level, entry.logger, entry.message);

        if !entry.fields.is_empty() {
            let fields_str: Vec<String> = entry.fields.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            output.push_str(&format!(" {{{}}}", fields_str.join(", ")));
        }

        output
    }

    /// Format log entry as JSON
    fn format_json(&self, entry: &LogEntry) -> String {
        serde_json::to_string(entry).unwrap_or_else(|_| {
            format!("{{\"error\": \"Failed to serialize log entry\", \"message\": {:?}}}", entry.message)
        })
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                fields: BTreeMap::new(),
            },
        }
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add a duration field in seconds
    pub fn duration(self, key: &str, duration: Duration) -> Self {
        self.field(key, duration.as_secs_f64())
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_exit_code", error.exit_code())
    }

    /// Finalize and write the log entry
    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Performance timing logger for iterations and whole runs
pub struct PerformanceLogger {
    logger: Logger,
    start_times: HashMap<String, DateTime<Utc>>,
}

impl PerformanceLogger {
    /// Create a performance logger writing through `logger`
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            start_times: HashMap::new(),
        }
    }

    /// Start timing an operation
    pub async fn start_timing(&mut self, operation: &str) {
        let start_time = Utc::now();
        self.start_times.insert(operation.to_string(), start_time);

        self.logger.debug(&format!("Started timing: {}", operation))
            .field("operation", operation)
            .field("start_time", start_time)
            .log()
            .await;
    }

    /// End timing an operation and log the duration
    pub async fn end_timing(&mut self, operation: &str) -> Option<chrono::Duration> {
        let Some(start_time) = self.start_times.remove(operation) else {
            self.logger.warn(&format!("Attempted to end timing for unknown operation: {}", operation))
                .field("operation", operation)
                .log()
                .await;
            return None;
        };

        let end_time = Utc::now();
        let elapsed = end_time - start_time;

        self.logger.info(&format!("Completed {} in {}ms", operation, elapsed.num_milliseconds()))
            .field("operation", operation)
            .field("start_time", start_time)
            .field("end_time", end_time)
            .field("duration_ms", elapsed.num_milliseconds())
            .log()
            .await;

        Some(elapsed)
    }

    /// Log one finished iteration
    pub async fn log_iteration(&self, record: &IterationRecord) {
        let Some((baseline, candidate)) = record.durations() else {
            return;
        };

        self.logger.info(&format!(
            "Iteration {} done: baseline {:.3}s, candidate {:.3}s",
            record.index + 1,
            baseline.as_secs_f64(),
            candidate.as_secs_f64()
        ))
            .field("iteration", record.index + 1)
            .field("baseline_prefix", &record.baseline_prefix)
            .field("candidate_prefix", &record.candidate_prefix)
            .duration("baseline_secs", baseline)
            .duration("candidate_secs", candidate)
            .field("files", record.baseline_files)
            .log()
            .await;
    }

    /// Log the aggregate of a whole run
    pub async fn log_run_summary(&self, iterations: usize, total: Duration) {
        let average = if iterations > 0 {
            total.as_secs_f64() / iterations as f64
        } else {
            0.0
        };

        self.logger.info(&format!(
            "Run summary: {} iteration(s) in {:.3}s (avg {:.3}s per iteration)",
            iterations,
            total.as_secs_f64(),
            average
        ))
            .field("iterations", iterations)
            .duration("total_secs", total)
            .field("avg_per_iteration_secs", average)
            .log()
            .await;
    }
}

/// Logger factory sharing one session id across components
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    /// Create a new logger factory
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a logger with a specific name
    pub async fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name, &self.config);
        logger.set_session_id(self.session_id.clone()).await;
        logger
    }

    /// Create a performance logger
    pub async fn create_performance_logger(&self) -> PerformanceLogger {
        PerformanceLogger::new(self.create_logger("PERF").await)
    }

    /// Get session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}
