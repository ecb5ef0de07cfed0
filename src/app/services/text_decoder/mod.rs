//! Text decoding and preamble extraction for text-based payloads
//!
//! Instrument exports arrive in whatever encoding the vendor software chose and
//! usually carry a free-form header before the numeric data. This module turns
//! raw bytes into text and separates that header from the data:
//! - [`decoder`] - BOM-aware UTF-8 decoding with a latin-1 fallback
//! - [`preamble`] - data-marker and comment-run preamble splitting plus
//!   best-effort `key: value` metadata extraction

pub mod decoder;
pub mod preamble;

#[cfg(test)]
pub mod tests;

pub use decoder::decode_text;
pub use preamble::{extract_preamble, split_lines, strip_to_data};
