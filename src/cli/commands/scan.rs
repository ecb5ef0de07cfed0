//! Scan command: preview every regular file below a directory

use crate::app::services::ingest_engine::IngestEngine;
use crate::cli::args::{OutputFormat, ScanArgs};
use crate::cli::commands::shared::{
    RunSummary, create_progress_bar, load_configuration, setup_logging, write_json,
};
use crate::models::{ParserKind, PreviewOptions, RawPayload};
use colored::Colorize;
use indicatif::ProgressBar;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Outcome of previewing one file
#[derive(Debug, Clone, Serialize)]
pub struct ScanEntry {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub parser: Option<ParserKind>,
    pub suggested_x_index: Option<usize>,
    pub suggested_y_index: Option<usize>,
    pub x_unit_hint: Option<String>,
    pub y_unit_hint: Option<String>,
    pub warnings: Vec<String>,
    pub error: Option<String>,
}

impl ScanEntry {
    fn failed(path: &Path, size_bytes: u64, error: String) -> Self {
        Self {
            path: path.to_path_buf(),
            size_bytes,
            parser: None,
            suggested_x_index: None,
            suggested_y_index: None,
            x_unit_hint: None,
            y_unit_hint: None,
            warnings: Vec::new(),
            error: Some(error),
        }
    }

    /// Previewed with a confident X/Y suggestion
    pub fn is_mapped(&self) -> bool {
        self.suggested_x_index.is_some() && self.suggested_y_index.is_some()
    }
}

/// Every file's outcome plus totals
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub root: PathBuf,
    pub entries: Vec<ScanEntry>,
}

impl ScanReport {
    /// Previewed files per parser
    pub fn parser_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for parser in self.entries.iter().filter_map(|e| e.parser) {
            *counts.entry(parser.to_string()).or_insert(0) += 1;
        }
        counts
    }

    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|e| e.error.is_some()).count()
    }

    pub fn total_warnings(&self) -> usize {
        self.entries.iter().map(|e| e.warnings.len()).sum()
    }

    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|e| e.size_bytes).sum()
    }
}

/// Regular files below `root`, sorted for a stable report order
pub fn discover_files(root: &Path, follow_links: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(follow_links) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable entry below {}: {}", root.display(), e),
        }
    }
    files.sort();
    debug!("Discovered {} files below {}", files.len(), root.display());
    files
}

fn scan_file(engine: &IngestEngine, path: &Path, options: &PreviewOptions) -> ScanEntry {
    let size_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    let raw = match RawPayload::from_path(path, engine.config().max_preview_bytes) {
        Ok(raw) => raw,
        Err(e) => return ScanEntry::failed(path, size_bytes, e.to_string()),
    };

    match engine.preview(&raw, options) {
        Ok(preview) => ScanEntry {
            path: path.to_path_buf(),
            size_bytes,
            parser: Some(preview.parser),
            suggested_x_index: preview.suggested_x_index,
            suggested_y_index: preview.suggested_y_index,
            x_unit_hint: preview.x_unit_hint,
            y_unit_hint: preview.y_unit_hint,
            warnings: preview.warnings,
            error: None,
        },
        Err(e) => {
            let mut entry = ScanEntry::failed(path, size_bytes, e.to_string());
            entry.warnings = e.warnings();
            entry
        }
    }
}

/// Preview every file below `root`; per-file failures are recorded, not raised
pub fn scan_directory(
    engine: &IngestEngine,
    root: &Path,
    options: &PreviewOptions,
    follow_links: bool,
    progress: Option<&ProgressBar>,
) -> ScanReport {
    let files = discover_files(root, follow_links);
    if let Some(pb) = progress {
        pb.set_length(files.len() as u64);
    }

    let mut entries = Vec::with_capacity(files.len());
    for path in &files {
        if let Some(pb) = progress {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            pb.set_message(format!("Previewing {}", name));
        }

        let entry = scan_file(engine, path, options);
        if let Some(error) = &entry.error {
            warn!("Failed to preview {}: {}", path.display(), error);
        }
        entries.push(entry);

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_with_message(format!("Previewed {} files", files.len()));
    }

    ScanReport {
        root: root.to_path_buf(),
        entries,
    }
}

fn print_report(report: &ScanReport) {
    println!();
    println!("{}", "Scan Summary".bright_green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for entry in &report.entries {
        let relative = entry
            .path
            .strip_prefix(&report.root)
            .unwrap_or(&entry.path)
            .display()
            .to_string();
        match (&entry.error, entry.parser) {
            (Some(error), _) => {
                println!("  {} {} {}", "✗".red().bold(), relative, error.bright_black());
            }
            (None, Some(parser)) => {
                let mapping = match (entry.suggested_x_index, entry.suggested_y_index) {
                    (Some(x), Some(y)) => format!("x={} y={}", x, y),
                    _ => "needs mapping".to_string(),
                };
                let marker = if entry.is_mapped() {
                    "✓".bright_green().bold()
                } else {
                    "?".yellow().bold()
                };
                println!(
                    "  {} {} [{}] {} {}",
                    marker,
                    relative.bright_cyan(),
                    parser,
                    mapping,
                    format!("({} warnings)", entry.warnings.len()).bright_black()
                );
            }
            (None, None) => {}
        }
    }

    println!();
    println!(
        "   • Files scanned: {} ({})",
        report.entries.len(),
        RunSummary::format_size(report.total_bytes())
    );
    for (parser, count) in report.parser_counts() {
        println!("   • {}: {}", parser, count);
    }
    println!("   • Warnings: {}", report.total_warnings());
    if report.failed() > 0 {
        println!("   • {} {}", "Failed:".red().bold(), report.failed());
    }
    println!();
}

/// Run the scan command
pub fn run_scan(args: &ScanArgs) -> anyhow::Result<RunSummary> {
    setup_logging(&args.common);
    args.validate()?;
    let start = Instant::now();

    let config = load_configuration(&args.common)?;
    let engine = IngestEngine::with_config(config);
    let options = PreviewOptions {
        max_rows: args.max_rows,
        hdu_index: None,
    };

    let progress = args
        .common
        .show_progress()
        .then(|| create_progress_bar(0, "Discovering files..."));
    let report = scan_directory(
        &engine,
        &args.dir,
        &options,
        args.follow_links,
        progress.as_ref(),
    );

    info!(
        "Scanned {} files below {} ({} failed)",
        report.entries.len(),
        args.dir.display(),
        report.failed()
    );

    match args.format {
        OutputFormat::Json => write_json(&report, None)?,
        OutputFormat::Human if args.common.show_progress() => print_report(&report),
        OutputFormat::Human => {}
    }

    Ok(RunSummary {
        files_processed: report.entries.len() - report.failed(),
        files_failed: report.failed(),
        warnings_raised: report.total_warnings(),
        processing_time: start.elapsed(),
        ..RunSummary::default()
    })
}
