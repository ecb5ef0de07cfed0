//! Test utilities for delimited-text parsing
//!
//! Shared fixtures and helpers used across the delimited parser test modules.

use crate::app::services::delimited_parser::DelimitedParser;
use crate::config::IngestConfig;


/// Parser with default limits
pub fn default_parser() -> DelimitedParser {
    DelimitedParser::new(&IngestConfig::default())
}

/// Headed CSV with a unit in each header cell and three numeric columns
pub fn create_three_column_csv() -> String {
    r#"wavelength (nm),flux [W/m2/nm],error
400.0,1.25,0.01
400.5,1.27,0.01
401.0,1.31,0.02
401.5,1.28,0.02
"#
    .to_string()
}

/// Headerless whitespace-aligned export behind a vendor marker
pub fn create_aligned_export() -> String {
    r#"Spectrometer: USB4F03499
Integration Time (sec): 1.000000E-1
>>>>>Begin Spectral Data<<<<<
  345.39    2.364
  345.61    2.371
  345.82    2.380
"#
    .to_string()
}

/// Headerless `%10.3f` columns whose padding varies line to line
pub fn create_right_aligned_columns() -> String {
    "   500.000     1.000\n   750.500    12.500\n  1000.000   123.250\n  1250.000     7.125\n"
        .to_string()
}
