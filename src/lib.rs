//! Spectra Ingest Library
//!
//! A Rust library for turning uploaded spectral data files of unknown
//! provenance into a canonical, plottable X/Y series.
//!
//! This library provides tools for:
//! - Sniffing the container format (FITS, gzip-wrapped FITS, JCAMP-DX, delimited text)
//! - Decoding text exports and lifting instrument preambles into metadata
//! - Tabulating delimited text and suggesting X/Y columns by header vocabulary
//! - Decoding JCAMP-DX `XYDATA` blocks, including the `(X++(Y..Y))` form
//! - Inspecting FITS binary and ASCII tables and choosing the spectrum HDU
//! - Canonicalizing series to ascending X with finite values only
//!
//! Malformed or ambiguous input is reported as warnings on the result; only
//! unreadable binary containers are errors.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Core application modules
pub mod app {
    pub mod services {
        pub mod axis_scorer;
        pub mod canonicalizer;
        pub mod delimited_parser;
        pub mod fits_reader;
        pub mod format_sniffer;
        pub mod ingest_engine;
        pub mod jcamp_parser;
        pub mod text_decoder;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::services::ingest_engine::IngestEngine;
pub use config::IngestConfig;
pub use error::{Error, Result};
pub use models::{
    CanonicalAction, ColumnSelection, IngestPreview, ParsedSeries, ParserKind, PreviewOptions,
    RawPayload, TextEncoding,
};
