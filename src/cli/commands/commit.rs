//! Commit command: parse one file into a canonical series

use crate::app::services::ingest_engine::IngestEngine;
use crate::cli::args::CommitArgs;
use crate::cli::commands::shared::{
    RunSummary, load_configuration, print_warnings, read_payload, report_structural_failure,
    setup_logging, write_json,
};
use crate::models::ColumnSelection;
use anyhow::Context;
use colored::Colorize;
use std::time::Instant;
use tracing::info;

/// Column selection from the command-line flags
pub fn selection_from_args(args: &CommitArgs) -> ColumnSelection {
    ColumnSelection {
        x_index: args.x_index,
        y_index: args.y_index,
        hdu_index: args.hdu,
        x_unit: args.x_unit.clone(),
        y_unit: args.y_unit.clone(),
    }
}

/// Run the commit command
pub fn run_commit(args: &CommitArgs) -> anyhow::Result<RunSummary> {
    setup_logging(&args.common);
    args.validate()?;
    let start = Instant::now();

    let config = load_configuration(&args.common)?;
    let raw = read_payload(&args.file, config.max_commit_bytes)?;
    let engine = IngestEngine::with_config(config);

    let series = match engine.commit(&raw, &selection_from_args(args)) {
        Ok(series) => series,
        Err(e) => {
            report_structural_failure(&e);
            return Err(e).with_context(|| format!("Failed to ingest {}", args.file.display()));
        }
    };

    info!(
        "Committed {}: {} points ({}, canonicalization {})",
        series.source_file_name,
        series.x_count,
        series.parser,
        series.parser_decisions.canonicalization
    );
    write_json(&series, args.output.as_deref())?;

    if args.common.show_progress() {
        print_warnings(&series.warnings);
        let status = if series.is_empty() {
            "empty".yellow().bold()
        } else {
            "ok".bright_green().bold()
        };
        eprintln!(
            "{} {} [{}] {} points",
            status,
            series.source_file_name.bright_cyan(),
            series.parser,
            series.x_count
        );
    }

    Ok(RunSummary {
        files_processed: 1,
        points_written: series.x_count,
        warnings_raised: series.warnings.len(),
        processing_time: start.elapsed(),
        ..RunSummary::default()
    })
}
