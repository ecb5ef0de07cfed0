//! Preview command: sniff one file and print the proposed mapping as JSON

use crate::app::services::ingest_engine::IngestEngine;
use crate::cli::args::PreviewArgs;
use crate::cli::commands::shared::{
    RunSummary, load_configuration, print_warnings, read_payload, report_structural_failure,
    setup_logging, write_json,
};
use crate::models::PreviewOptions;
use anyhow::Context;
use colored::Colorize;
use std::time::Instant;
use tracing::info;

/// Run the preview command
pub fn run_preview(args: &PreviewArgs) -> anyhow::Result<RunSummary> {
    setup_logging(&args.common);
    args.validate()?;
    let start = Instant::now();

    let config = load_configuration(&args.common)?;
    let raw = read_payload(&args.file, config.max_preview_bytes)?;
    let engine = IngestEngine::with_config(config);

    let options = PreviewOptions {
        max_rows: args.max_rows,
        hdu_index: args.hdu,
    };
    let preview = match engine.preview(&raw, &options) {
        Ok(preview) => preview,
        Err(e) => {
            report_structural_failure(&e);
            return Err(e).with_context(|| format!("Failed to preview {}", args.file.display()));
        }
    };

    info!(
        "Previewed {} as {} ({} columns, {} warnings)",
        preview.file_name,
        preview.parser,
        preview.columns.len(),
        preview.warnings.len()
    );
    write_json(&preview, None)?;

    if args.common.show_progress() {
        print_warnings(&preview.warnings);
        let mapping = match (preview.suggested_x_index, preview.suggested_y_index) {
            (Some(x), Some(y)) => format!("suggested x={} y={}", x, y),
            _ => "no confident X/Y suggestion".to_string(),
        };
        eprintln!(
            "{} {} [{}] {}",
            "preview:".bright_green().bold(),
            preview.file_name.bright_cyan(),
            preview.parser,
            mapping
        );
    }

    Ok(RunSummary {
        files_processed: 1,
        warnings_raised: preview.warnings.len(),
        processing_time: start.elapsed(),
        ..RunSummary::default()
    })
}
