//! Shared components for CLI commands
//!
//! Logging setup, configuration loading, payload reading and output helpers
//! used by every subcommand.

use crate::cli::args::CommonArgs;
use crate::config::IngestConfig;
use crate::models::RawPayload;
use crate::Error;
use anyhow::Context;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Outcome counters reported by every command
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Files handed to the engine
    pub files_processed: usize,
    /// Files that could not be read or failed structurally
    pub files_failed: usize,
    /// Points in committed series
    pub points_written: usize,
    /// Warnings attached to results
    pub warnings_raised: usize,
    /// Wall-clock time
    pub processing_time: Duration,
}

impl RunSummary {
    /// Format a byte count in human-readable form
    pub fn format_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

/// Set up structured logging on stderr so stdout stays machine-readable
pub fn setup_logging(args: &CommonArgs) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("spectra_ingest={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Load the configuration file when given, otherwise defaults
pub fn load_configuration(args: &CommonArgs) -> anyhow::Result<IngestConfig> {
    let config = match &args.config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            IngestConfig::from_json_file(path)?
        }
        None => {
            debug!("No config file given, using defaults");
            IngestConfig::default()
        }
    };
    config.validate()?;
    Ok(config)
}

/// Read a payload, enforcing the byte bound before the engine sees it
pub fn read_payload(path: &Path, limit: usize) -> anyhow::Result<RawPayload> {
    RawPayload::from_path(path, limit)
        .with_context(|| format!("Failed to load {}", path.display()))
}

/// Print the result-carrying messages of a structural failure
pub fn report_structural_failure(error: &Error) {
    for message in error.warnings() {
        eprintln!("{} {}", "warning:".yellow().bold(), message);
    }
}

/// Print warnings attached to a result
pub fn print_warnings(warnings: &[String]) {
    for message in warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), message);
    }
}

/// Pretty JSON to a file, or to stdout when no path is given
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    match output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_format_size() {
        assert_eq!(RunSummary::format_size(500), "500 B");
        assert_eq!(RunSummary::format_size(1536), "1.50 KB");
        assert_eq!(RunSummary::format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_read_payload_enforces_limit() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"x,y\n1,2\n").unwrap();

        assert!(read_payload(file.path(), 4).is_err());
        let raw = read_payload(file.path(), 1024).unwrap();
        assert_eq!(raw.len(), 8);
    }

    #[test]
    fn test_load_configuration_defaults() {
        let config = load_configuration(&CommonArgs::default()).unwrap();
        assert_eq!(config, IngestConfig::default());
    }

    #[test]
    fn test_write_json_to_file() {
        let file = NamedTempFile::new().unwrap();
        write_json(&vec![1, 2, 3], Some(file.path())).unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        let back: Vec<i32> = serde_json::from_str(&written).unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }
}
