//! Command implementations for the spectra-ingest CLI
//!
//! Each command lives in its own module:
//! - `preview`: sniff one file and print the proposed X/Y mapping
//! - `commit`: parse one file into a canonical series
//! - `scan`: preview every file below a directory

pub mod commit;
pub mod preview;
pub mod scan;
pub mod shared;

pub use shared::RunSummary;

use crate::cli::args::{Args, Commands};

/// Main command runner
///
/// Dispatches to the subcommand handler. Callers handle the missing
/// subcommand case before calling.
pub fn run(args: Args) -> anyhow::Result<RunSummary> {
    match args.command {
        Some(Commands::Preview(preview_args)) => preview::run_preview(&preview_args),
        Some(Commands::Commit(commit_args)) => commit::run_commit(&commit_args),
        Some(Commands::Scan(scan_args)) => scan::run_scan(&scan_args),
        None => Ok(RunSummary::default()),
    }
}
