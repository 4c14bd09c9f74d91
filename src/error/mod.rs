//! Error handling for the transfer benchmark

use thiserror::Error;

/// Custom error types for the transfer benchmark
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Parsing errors (numbers, policies, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// I/O errors outside manifest handling
    #[error("I/O error: {0}")]
    Io(String),

    /// Manifest could not be created, walked or written
    #[error("Manifest I/O error: {0}")]
    ManifestIo(String),

    /// Child process missing, denied or exited unsuccessfully
    #[error("Execution error: {0}")]
    Execution(String),

    /// Bulk delete of uploaded objects failed
    #[error("Cleanup error: {0}")]
    Cleanup(String),

    /// Statistics calculation errors
    #[error("Statistics error: {0}")]
    Statistics(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new manifest I/O error
    pub fn manifest_io<S: Into<String>>(message: S) -> Self {
        Self::ManifestIo(message.into())
    }

    /// Create a new execution error
    pub fn execution<S: Into<String>>(message: S) -> Self {
        Self::Execution(message.into())
    }

    /// Create a new cleanup error
    pub fn cleanup<S: Into<String>>(message: S) -> Self {
        Self::Cleanup(message.into())
    }

    /// Create a new statistics error
    pub fn statistics<S: Into<String>>(message: S) -> Self {
        Self::Statistics(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Parse(_) => "PARSE",
            Self::Io(_) => "IO",
            Self::ManifestIo(_) => "MANIFEST",
            Self::Execution(_) => "EXEC",
            Self::Cleanup(_) => "CLEANUP",
            Self::Statistics(_) => "STATS",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file or command line arguments.", msg)
            }
            Self::Validation(msg) => {
                format!("Invalid input: {}\n\nSuggestion: Check bucket URIs, regions and binary paths.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse value: {}\n\nSuggestion: Check the format of numeric and policy settings.", msg)
            }
            Self::Io(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check file permissions and disk space.", msg)
            }
            Self::ManifestIo(msg) => {
                format!("Manifest generation failed: {}\n\nSuggestion: Check that the source directory is readable and the manifest directory is writable. Do not reuse a manifest from a failed run.", msg)
            }
            Self::Execution(msg) => {
                format!("Transfer tool failed: {}\n\nSuggestion: Verify the executable path, its permissions and your object store credentials. All measurements from this run were discarded.", msg)
            }
            Self::Cleanup(msg) => {
                format!("Cleanup failed: {}\n\nSuggestion: Remove the uploaded objects manually, or rerun with --cleanup warn to report statistics despite cleanup failures.", msg)
            }
            Self::Statistics(msg) => {
                format!("Statistics calculation failed: {}\n\nSuggestion: This indicates no successful measurements were collected.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,  // Invalid configuration/usage
            Self::Io(_) | Self::ManifestIo(_) => 5,  // I/O issues
            Self::Execution(_) | Self::Statistics(_) => 6,  // Measurement issues
            Self::Cleanup(_) => 7,
            Self::Internal(_) => 99,  // Internal/unexpected errors
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Execution(_) | Self::Cleanup(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Io(_) | Self::ManifestIo(_) | Self::Statistics(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<walkdir::Error> for AppError {
    fn from(error: walkdir::Error) -> Self {
        match error.path() {
            Some(path) => Self::manifest_io(format!("cannot read '{}': {}", path.display(), error)),
            None => Self::manifest_io(error.to_string()),
        }
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

// Anyhow integration
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error, keeping its category
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let context = f();
            match e.into() {
                AppError::Config(msg) => AppError::Config(format!("{}: {}", context, msg)),
                AppError::Validation(msg) => AppError::Validation(format!("{}: {}", context, msg)),
                AppError::Parse(msg) => AppError::Parse(format!("{}: {}", context, msg)),
                AppError::Io(msg) => AppError::Io(format!("{}: {}", context, msg)),
                AppError::ManifestIo(msg) => AppError::ManifestIo(format!("{}: {}", context, msg)),
                AppError::Execution(msg) => AppError::Execution(format!("{}: {}", context, msg)),
                AppError::Cleanup(msg) => AppError::Cleanup(format!("{}: {}", context, msg)),
                AppError::Statistics(msg) => AppError::Statistics(format!("{}: {}", context, msg)),
                AppError::Internal(msg) => AppError::Internal(format!("{}: {}", context, msg)),
            }
        })
    }

    fn context(self, message: &'static str) -> Result<T> {
        self.with_context(|| message.to_string())
    }
}

/// Error reporter for user feedback on fatal errors
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Render an error the way `report_error` prints it
    pub fn render(&self, error: &AppError) -> String {
        let mut rendered = error.format_for_console(self.use_color);
        if self.verbose {
            rendered.push_str("\n\n");
            rendered.push_str(&error.user_friendly_message());
        }
        rendered
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.render(error));
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}
