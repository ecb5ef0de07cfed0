//! Delimited-text tabulator for CSV/TSV-like spectral exports
//!
//! This module turns decoded text into rows and columns, decides which columns
//! are numeric, and suggests an X/Y mapping for the user to confirm.
//!
//! ## Architecture
//!
//! - [`parser`] - Orchestration of preview and full X/Y extraction
//! - [`dialect`] - Delimiter and header-presence sniffing
//! - [`tabulator`] - Row tokenization with the chosen delimiter
//! - [`column_analysis`] - Numeric column classification and axis suggestion
//! - [`units`] - Unit hints embedded in header cells
//! - [`stats`] - Extraction statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use spectra_ingest::IngestConfig;
//! use spectra_ingest::app::services::delimited_parser::DelimitedParser;
//!
//! let parser = DelimitedParser::new(&IngestConfig::default());
//! let preview = parser.preview("wavelength (nm),flux\n500,1.0\n501,1.1\n", 50);
//!
//! assert_eq!(preview.suggested_x_index, Some(0));
//! assert_eq!(preview.x_unit_hint.as_deref(), Some("nm"));
//! ```

pub mod column_analysis;
pub mod dialect;
pub mod parser;
pub mod stats;
pub mod tabulator;
pub mod units;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use column_analysis::{AxisSuggestion, ColumnAnalysis};
pub use dialect::Dialect;
pub use parser::DelimitedParser;
pub use stats::{DelimitedPreview, DelimitedSeries, ExtractionStats};
