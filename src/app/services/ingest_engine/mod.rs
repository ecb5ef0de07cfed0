//! Ingestion engine: raw bytes in, canonical spectral series out
//!
//! The engine sniffs the payload, routes it to the FITS, JCAMP-DX or
//! delimited-text path, and runs every result through the canonicalizer.
//!
//! ## Usage
//!
//! ```rust
//! use spectra_ingest::{ColumnSelection, IngestEngine, RawPayload};
//!
//! let engine = IngestEngine::new();
//! let raw = RawPayload::new("scan.csv", "x,y\n3,30\n2,20\n1,10\n");
//! let series = engine
//!     .commit(&raw, &ColumnSelection::new().with_columns(0, 1))
//!     .unwrap();
//!
//! assert_eq!(series.x, vec![1.0, 2.0, 3.0]);
//! assert_eq!(series.y, vec![10.0, 20.0, 30.0]);
//! ```

pub mod engine;

#[cfg(test)]
pub mod tests;

pub use engine::IngestEngine;
