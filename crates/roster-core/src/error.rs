//! Error types for roster-core

use thiserror::Error;

/// Result type alias for roster-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in roster-core
#[derive(Error, Debug)]
pub enum Error {
    /// A raw field that must be numeric could not be parsed
    #[error("field '{field}' is not a valid number: '{value}'")]
    Format {
        /// Name of the offending field
        field: &'static str,
        /// Raw value as read from the source
        value: String,
    },

    /// A raw field failed a structural check (e.g. postcode not an integer)
    #[error("field '{field}' failed validation: '{value}' is not a valid integer")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// Raw value as read from the source
        value: String,
    },

    /// A record could not be transformed; wraps the underlying field error
    #[error("record {position}: {source}")]
    Record {
        /// Zero-based position of the record in the input sequence
        position: usize,
        /// The field-level error
        #[source]
        source: Box<Error>,
    },

    /// The source file could not be split into records
    #[error("extract error at line {line}: {message}")]
    Extract {
        /// One-based line number in the source file
        line: u64,
        /// Description of the error
        message: String,
    },

    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse YAML configuration
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// Sink error
    #[error("sink '{sink}' error: {message}")]
    Sink {
        /// Name of the sink
        sink: String,
        /// Description of the error
        message: String,
    },

    /// Delimited file reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap a field-level error with the position of the record that raised it
    pub fn at_record(self, position: usize) -> Self {
        Error::Record {
            position,
            source: Box::new(self),
        }
    }

    /// Name of the raw field responsible for this error, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Error::Format { field, .. } | Error::Validation { field, .. } => Some(*field),
            Error::Record { source, .. } => source.field(),
            _ => None,
        }
    }

    /// Whether this error rejects a single record rather than the whole run
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            Error::Format { .. } | Error::Validation { .. } | Error::Record { .. }
        )
    }
}
