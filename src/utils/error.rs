use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Why a remote fetch failed. Timeouts and transport failures are kept apart
/// so the caller can tell them apart in logs and messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    Timeout(Duration),
    Connection(String),
    Status(u16),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Timeout(after) => {
                write!(f, "request timed out after {}s", after.as_secs_f64())
            }
            FetchFailure::Connection(detail) => write!(f, "connection failed: {}", detail),
            FetchFailure::Status(code) => write!(f, "unexpected HTTP status {}", code),
        }
    }
}

#[derive(Error, Debug)]
pub enum SsqError {
    #[error("Fetch failed for {url}: {reason}")]
    FetchError { url: String, reason: FetchFailure },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid record: {message}")]
    InvalidRecord { message: String },

    #[error("Invalid {field} '{value}': {reason}")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for {field} '{value}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Parse,
    Storage,
    Validation,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code the `ssq` binary reports for an error of this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl SsqError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SsqError::FetchError { .. } => ErrorCategory::Network,
            SsqError::ParseError { .. } => ErrorCategory::Parse,
            SsqError::CsvError(_)
            | SsqError::IoError(_)
            | SsqError::SerializationError(_)
            | SsqError::InvalidRecord { .. } => ErrorCategory::Storage,
            SsqError::ValidationError { .. } => ErrorCategory::Validation,
            SsqError::ConfigValidationError { .. } | SsqError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Parse | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// Network failures are transient; the caller may try again later.
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SsqError::FetchError {
                reason: FetchFailure::Timeout(_) | FetchFailure::Connection(_),
                ..
            }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SsqError::FetchError {
                reason: FetchFailure::Timeout(_),
                ..
            } => "Check the network connection or raise source.timeout_seconds, then retry",
            SsqError::FetchError {
                reason: FetchFailure::Connection(_),
                ..
            } => "Check the network connection and the source endpoint, then retry",
            SsqError::FetchError { .. } => "The data source rejected the request; verify the endpoint URL",
            SsqError::ParseError { .. } => {
                "The remote page layout changed; the table parser needs updating"
            }
            SsqError::CsvError(_) | SsqError::InvalidRecord { .. } => {
                "The cache file looks corrupted; run `ssq update` to rebuild it"
            }
            SsqError::IoError(_) => "Check that the data directory exists and is writable",
            SsqError::SerializationError(_) => "Retry without --json",
            SsqError::ValidationError { .. } => {
                "Red balls: 6 distinct numbers 01-33; blue ball: 01-16; period: 5 digits; date: YYYY-MM-DD"
            }
            SsqError::ConfigValidationError { .. } | SsqError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and try again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SsqError::FetchError { reason, .. } => {
                format!("Could not download draw history ({})", reason)
            }
            SsqError::ParseError { .. } => "Draw history page has an unexpected layout".to_string(),
            SsqError::ValidationError { field, value, reason } => {
                format!("Invalid {} '{}': {}", field, value, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SsqError>;
