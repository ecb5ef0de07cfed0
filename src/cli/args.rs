//! Command-line argument definitions for spectra-ingest
//!
//! This module defines the CLI interface using the clap derive API. Every
//! subcommand shares the logging and configuration flags in [`CommonArgs`].

use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the spectral ingestion tool
///
/// Sniffs spectral data files (FITS, JCAMP-DX, CSV/TSV exports), previews the
/// proposed X/Y mapping and commits canonical series as JSON.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "spectra-ingest",
    version,
    about = "Preview and ingest spectral data files as canonical X/Y series",
    long_about = "Reads FITS tables (plain or gzip-compressed), JCAMP-DX spectra and delimited \
                  text exports from spectrometers. The preview command proposes an X/Y column \
                  mapping with unit hints; the commit command produces an ascending, finite \
                  X/Y series with a record of every parsing decision."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Inspect a file and propose an X/Y mapping
    Preview(PreviewArgs),
    /// Parse a file into a canonical X/Y series
    Commit(CommitArgs),
    /// Preview every file below a directory and summarize the results
    Scan(ScanArgs),
}

/// Flags shared by every subcommand
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct CommonArgs {
    /// Path to a JSON configuration file
    ///
    /// Missing fields keep their defaults (preview rows, sniff windows,
    /// preamble cap, byte limits).
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl CommonArgs {
    /// Tracing level for the `spectra_ingest` target
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars and summaries are hidden in quiet mode
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Arguments for the preview command
#[derive(Debug, Clone, Parser)]
pub struct PreviewArgs {
    /// File to preview
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Number of preview rows (defaults to the configured value)
    #[arg(long = "max-rows", value_name = "N")]
    pub max_rows: Option<usize>,

    /// FITS HDU to preview instead of the best-effort choice
    #[arg(long = "hdu", value_name = "N")]
    pub hdu: Option<usize>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl PreviewArgs {
    pub fn validate(&self) -> Result<()> {
        validate_file(&self.file)?;
        if self.max_rows == Some(0) {
            return Err(Error::configuration("--max-rows must be at least 1"));
        }
        Ok(())
    }
}

/// Arguments for the commit command
#[derive(Debug, Clone, Parser)]
pub struct CommitArgs {
    /// File to ingest
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// X column index (0-based); defaults to the suggested column
    #[arg(short = 'x', long = "x-index", value_name = "N")]
    pub x_index: Option<usize>,

    /// Y column index (0-based); defaults to the suggested column
    #[arg(short = 'y', long = "y-index", value_name = "N")]
    pub y_index: Option<usize>,

    /// FITS HDU to read instead of the best-effort choice
    #[arg(long = "hdu", value_name = "N")]
    pub hdu: Option<usize>,

    /// X unit, overriding any unit found in the file
    #[arg(long = "x-unit", value_name = "UNIT")]
    pub x_unit: Option<String>,

    /// Y unit, overriding any unit found in the file
    #[arg(long = "y-unit", value_name = "UNIT")]
    pub y_unit: Option<String>,

    /// Write the series JSON here instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl CommitArgs {
    pub fn validate(&self) -> Result<()> {
        validate_file(&self.file)?;
        if let (Some(x), Some(y)) = (self.x_index, self.y_index) {
            if x == y {
                return Err(Error::configuration(format!(
                    "X and Y must be different columns (both are {})",
                    x
                )));
            }
        }
        Ok(())
    }
}

/// Report format for the scan command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Coloured summary table
    #[default]
    Human,
    /// One JSON document with every file's outcome
    Json,
}

/// Arguments for the scan command
#[derive(Debug, Clone, Parser)]
pub struct ScanArgs {
    /// Directory to walk
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Number of preview rows per file
    #[arg(long = "max-rows", value_name = "N")]
    pub max_rows: Option<usize>,

    /// Follow symbolic links while walking
    #[arg(long = "follow-links")]
    pub follow_links: bool,

    /// Report format
    #[arg(long = "format", value_enum, default_value = "human")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl ScanArgs {
    pub fn validate(&self) -> Result<()> {
        if !self.dir.is_dir() {
            return Err(Error::configuration(format!(
                "Scan path is not a directory: {}",
                self.dir.display()
            )));
        }
        if self.max_rows == Some(0) {
            return Err(Error::configuration("--max-rows must be at least 1"));
        }
        Ok(())
    }
}

fn validate_file(path: &std::path::Path) -> Result<()> {
    if !path.is_file() {
        return Err(Error::configuration(format!(
            "Input file does not exist: {}",
            path.display()
        )));
    }
    Ok(())
}
