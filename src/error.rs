//! Error handling for spectral ingestion operations.
//!
//! Only structural failures are errors: a payload that claims to be a binary
//! container (gzip-wrapped or plain FITS) but cannot be opened at all. Every
//! other problem is recorded as a warning on the result and processing
//! continues with a best-effort choice.

use crate::constants::messages;
use thiserror::Error;

/// Comprehensive error types for spectral ingestion
#[derive(Error, Debug)]
pub enum Error {
    /// Payload looks like gzip-compressed FITS but could not be inflated
    #[error("Decompression failed for '{file}': {message}")]
    Decompression {
        file: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Payload was classified as FITS but its structure cannot be read
    #[error("Unreadable FITS structure in '{file}': {message}")]
    FitsStructure { file: String, message: String },

    /// Input exceeds the byte bound the caller enforces before ingestion
    #[error("Input '{file}' is {size} bytes, exceeding the {limit} byte limit")]
    InputTooLarge {
        file: String,
        size: usize,
        limit: usize,
    },

    /// I/O operation failed (caller-side reads and writes)
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Create a decompression error with context
    pub fn decompression(
        file: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::Decompression {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a FITS structure error
    pub fn fits_structure(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FitsStructure {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create an input size error
    pub fn input_too_large(file: impl Into<String>, size: usize, limit: usize) -> Self {
        Self::InputTooLarge {
            file: file.into(),
            size,
            limit,
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a serialization error with context
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Whether this error is a structural failure of a claimed binary container
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Decompression { .. } | Self::FitsStructure { .. })
    }

    /// Human-readable lines a caller can show next to the failure, in the same
    /// register as result warnings
    pub fn warnings(&self) -> Vec<String> {
        match self {
            Self::Decompression { source, .. } => vec![
                messages::GZIP_PREVIEW_FAILED.to_string(),
                format!("gzip error: {}", source),
            ],
            Self::FitsStructure { message, .. } => {
                vec![format!("Failed to parse FITS preview: {}", message)]
            }
            other => vec![other.to_string()],
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON processing failed".to_string(),
            source: error,
        }
    }
}

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, Error>;
