//! Unified error hierarchy for TrailSync
//!
//! Track errors, formula input errors and import errors each get their own
//! enum; `TrailSyncError` wraps them for callers that do not care which
//! layer failed.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all TrailSync operations
#[derive(Debug, Error)]
pub enum TrailSyncError {
    /// Track accumulation or GPX decoding errors
    #[error("Track error: {0}")]
    Track(#[from] TrackError),

    /// Formula input errors
    #[error("Calculation error: {0}")]
    Calculation(#[from] CalculationError),

    /// File import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Errors raised while turning raw track data into a summary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    /// Fewer than two trackpoints were supplied
    #[error("Insufficient data: at least 2 trackpoints are required, found {found}")]
    InsufficientData { found: usize },

    /// The source document could not be decoded into trackpoints
    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },
}

impl TrackError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        TrackError::MalformedInput {
            reason: reason.into(),
        }
    }
}

/// Errors raised by the pace, effort and grip formulas
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    /// Input outside the range the formula accepts
    #[error("Invalid parameter for {calculation}: {parameter}={value}")]
    InvalidParameter {
        calculation: &'static str,
        parameter: &'static str,
        value: String,
    },

    /// Division by zero
    #[error("Division by zero in {calculation}")]
    DivisionByZero { calculation: &'static str },

    /// Nothing usable left after filtering the inputs
    #[error("Insufficient data for {calculation}: {reason}")]
    InsufficientData {
        calculation: &'static str,
        reason: String,
    },
}

impl CalculationError {
    pub(crate) fn invalid(
        calculation: &'static str,
        parameter: &'static str,
        value: impl ToString,
    ) -> Self {
        CalculationError::InvalidParameter {
            calculation,
            parameter,
            value: value.to_string(),
        }
    }
}

/// File import errors
#[derive(Debug, Error)]
pub enum ImportError {
    /// No importer accepts this file
    #[error("Unsupported format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Reading the file failed
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its contents were rejected
    #[error("{path}: {source}")]
    Track {
        path: PathBuf,
        #[source]
        source: TrackError,
    },
}

/// Result type alias for TrailSync operations
pub type Result<T> = std::result::Result<T, TrailSyncError>;

impl TrailSyncError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TrailSyncError::Track(TrackError::InsufficientData { .. }) => ErrorSeverity::Warning,
            TrailSyncError::Calculation(_) => ErrorSeverity::Warning,
            TrailSyncError::Import(ImportError::UnsupportedFormat { .. }) => ErrorSeverity::Warning,
            TrailSyncError::Configuration(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            TrailSyncError::Track(TrackError::InsufficientData { found }) => format!(
                "The track needs at least two points to measure a distance (found {}).",
                found
            ),
            TrailSyncError::Track(TrackError::MalformedInput { reason })
            | TrailSyncError::Import(ImportError::Track {
                source: TrackError::MalformedInput { reason },
                ..
            }) => format!("Could not read the GPX track: {}", reason),
            TrailSyncError::Import(ImportError::UnsupportedFormat { path }) => format!(
                "Don't know how to import {}. Only .gpx files are supported.",
                path.display()
            ),
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Broken installation or configuration
    Critical,
    /// Operation failed
    Error,
    /// Bad user input, nothing to compute
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical | ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = TrailSyncError::Track(TrackError::InsufficientData { found: 1 });
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = TrailSyncError::Track(TrackError::malformed("bad lat"));
        assert_eq!(err.severity(), ErrorSeverity::Error);

        let err = TrailSyncError::Configuration("unreadable".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_user_messages() {
        let err: TrailSyncError = TrackError::InsufficientData { found: 0 }.into();
        assert!(err.user_message().contains("at least two points"));

        let err: TrailSyncError = ImportError::Track {
            path: PathBuf::from("run.gpx"),
            source: TrackError::malformed("missing lat"),
        }
        .into();
        assert!(err.user_message().contains("missing lat"));

        let err: TrailSyncError = ImportError::UnsupportedFormat {
            path: PathBuf::from("run.fit"),
        }
        .into();
        assert!(err.user_message().contains("run.fit"));
    }

    #[test]
    fn test_calculation_error_display() {
        let err = CalculationError::invalid("treadmill", "speed_kmh", "-1");
        assert_eq!(
            err.to_string(),
            "Invalid parameter for treadmill: speed_kmh=-1"
        );
    }
}
