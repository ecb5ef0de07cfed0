//! JCAMP-DX decoder for infrared and other 1D spectra
//!
//! - [`header`] - `##KEY=value` record parsing and scale factors
//! - [`xydata`] - `(X++(Y..Y))` and `(XY..XY)` block decoding
//! - [`parser`] - Orchestration into a [`JcampSpectrum`]

pub mod header;
pub mod parser;
pub mod xydata;

#[cfg(test)]
pub mod tests;

pub use header::JcampHeader;
pub use parser::{JcampSpectrum, parse_jcamp};
pub use xydata::{GridExpansion, XyMode};
