//! Pure-Rust FITS table reader
//!
//! Reads binary (`BINTABLE`) and ASCII (`TABLE`) extensions from an
//! in-memory payload and offers their columns as X/Y candidates.
//!
//! ## Architecture
//!
//! - [`cards`] - 80-byte header cards and 2880-byte header blocks
//! - [`hdu`] - HDU walking and data sizes
//! - [`table`] - Column layouts and cell decoding
//! - [`inspector`] - Candidate listing, HDU choice, previews and extraction

pub mod cards;
pub mod hdu;
pub mod inspector;
pub mod table;

#[cfg(test)]
pub mod tests;

pub use hdu::{FitsFile, Hdu, HduKind};
pub use inspector::{FitsInspector, FitsPreview, FitsSeries};
pub use table::{ColumnFormat, Table};
