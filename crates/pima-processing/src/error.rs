//! Custom error types for loading, cleaning and exploring the dataset.
//!
//! This module provides a single error hierarchy using `thiserror` so that
//! every failure reaches the caller with the offending path, line or column.
//!
//! Errors are serializable, allowing the CLI to print them as JSON when
//! `--json` output is requested.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the cleaning pipeline and the explorer views.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// The input source does not exist or could not be read.
    #[error("Source '{path}' not found or unreadable: {source}")]
    SourceNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The input source is structurally invalid (ragged rows, no header).
    #[error("Malformed source: {0}")]
    MalformedSource(String),

    /// A column required by the clipping step is absent from the table.
    #[error("Required column '{0}' is missing from the table")]
    MissingColumn(String),

    /// A column has no non-missing values, so its median is undefined.
    #[error("Column '{0}' has no values to compute a median from")]
    EmptyColumn(String),

    /// A view was requested for a column that does not exist.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ProcessingError>,
    },
}

impl ProcessingError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProcessingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SourceNotFound { .. } => "SOURCE_NOT_FOUND",
            Self::MalformedSource(_) => "MALFORMED_SOURCE",
            Self::MissingColumn(_) => "MISSING_COLUMN",
            Self::EmptyColumn(_) => "EMPTY_COLUMN",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by a bad input file rather than by
    /// the caller or the environment.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::SourceNotFound { .. }
            | Self::MalformedSource(_)
            | Self::MissingColumn(_)
            | Self::EmptyColumn(_) => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for ProcessingError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        ProcessingError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ProcessingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProcessingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProcessingError::Polars(e).with_context(context))
    }
}
