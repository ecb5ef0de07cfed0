//! Configuration management and validation.
//!
//! Provides the tunable limits of the ingestion engine: preview size, sniffing
//! windows, preamble caps and the byte bounds callers enforce before handing a
//! payload to the engine.

use crate::constants::{
    DEFAULT_MAX_COMMIT_BYTES, DEFAULT_MAX_PREVIEW_BYTES, DEFAULT_PREVIEW_ROWS,
    DIALECT_SAMPLE_BYTES, HEADER_SNIFF_ROWS, MAGIC_SNIFF_BYTES, MAX_PREAMBLE_LINES,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Global configuration for spectral ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Number of rows returned (and sampled for column analysis) by preview
    pub preview_rows: usize,

    /// Bytes of cleaned text sampled by the delimiter/header sniffer
    pub dialect_sample_bytes: usize,

    /// Bytes of payload head inspected for magic numbers and content markers
    pub magic_sniff_bytes: usize,

    /// Maximum number of preamble lines kept for provenance
    pub max_preamble_lines: usize,

    /// Rows after the first consulted when deciding header presence
    pub header_sniff_rows: usize,

    /// Byte bound for preview uploads (enforced by the caller)
    pub max_preview_bytes: usize,

    /// Byte bound for commit uploads (enforced by the caller)
    pub max_commit_bytes: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            dialect_sample_bytes: DIALECT_SAMPLE_BYTES,
            magic_sniff_bytes: MAGIC_SNIFF_BYTES,
            max_preamble_lines: MAX_PREAMBLE_LINES,
            header_sniff_rows: HEADER_SNIFF_ROWS,
            max_preview_bytes: DEFAULT_MAX_PREVIEW_BYTES,
            max_commit_bytes: DEFAULT_MAX_COMMIT_BYTES,
        }
    }
}

impl IngestConfig {
    /// Load configuration from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            Error::serialization(format!("Invalid config {}", path.display()), e)
        })?;
        config.validate()?;
        debug!("Loaded ingest configuration from {}", path.display());
        Ok(config)
    }

    /// Create configuration with a custom preview row count
    pub fn with_preview_rows(mut self, preview_rows: usize) -> Self {
        self.preview_rows = preview_rows;
        self
    }

    /// Create configuration with a custom dialect sample size
    pub fn with_dialect_sample_bytes(mut self, bytes: usize) -> Self {
        self.dialect_sample_bytes = bytes;
        self
    }

    /// Create configuration with a custom preamble cap
    pub fn with_max_preamble_lines(mut self, lines: usize) -> Self {
        self.max_preamble_lines = lines;
        self
    }

    /// Create configuration with custom caller-side byte bounds
    pub fn with_byte_limits(mut self, preview: usize, commit: usize) -> Self {
        self.max_preview_bytes = preview;
        self.max_commit_bytes = commit;
        self
    }

    /// Validate that every limit is usable
    pub fn validate(&self) -> Result<()> {
        if self.preview_rows == 0 {
            return Err(Error::configuration("preview_rows must be at least 1"));
        }
        if self.dialect_sample_bytes == 0 {
            return Err(Error::configuration("dialect_sample_bytes must be at least 1"));
        }
        if self.magic_sniff_bytes < 8 {
            return Err(Error::configuration(
                "magic_sniff_bytes must cover the 8-byte FITS keyword",
            ));
        }
        if self.max_preview_bytes == 0 || self.max_commit_bytes == 0 {
            return Err(Error::configuration("byte limits must be positive"));
        }
        Ok(())
    }
}
