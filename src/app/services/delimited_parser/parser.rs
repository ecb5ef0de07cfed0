//! Core delimited-text parser implementation
//!
//! This module coordinates cleaning, dialect sniffing, tokenization and column
//! analysis for both preview and full X/Y extraction.

use tracing::{debug, info};

use super::column_analysis::ColumnAnalysis;
use super::dialect::{Dialect, sample_text, sniff_dialect};
use super::stats::{DelimitedPreview, DelimitedSeries, ExtractionStats};
use super::tabulator::{Tabulated, tabulate};
use super::units::unit_hint;
use crate::app::services::text_decoder::strip_to_data;
use crate::config::IngestConfig;
use crate::constants::messages;
use crate::models::{CellValue, ParseIssue, TabularRows};

/// Delimited-text parser for spectral exports
///
/// Handles:
/// - Vendor marker preambles and leading comment runs
/// - Delimiter and header sniffing over a bounded sample
/// - Numeric column detection and X/Y suggestion
/// - Full-file X/Y extraction for a confirmed mapping
#[derive(Debug, Clone)]
pub struct DelimitedParser {
    dialect_sample_bytes: usize,
    header_sniff_rows: usize,
}

impl DelimitedParser {
    /// Create a parser using the sniffing limits of a configuration
    pub fn new(config: &IngestConfig) -> Self {
        Self {
            dialect_sample_bytes: config.dialect_sample_bytes,
            header_sniff_rows: config.header_sniff_rows,
        }
    }

    /// Sniff the dialect of already-cleaned data text
    pub fn detect_dialect(&self, data: &str) -> Dialect {
        sniff_dialect(
            sample_text(data, self.dialect_sample_bytes),
            self.header_sniff_rows,
        )
    }

    /// Clean, sniff and tokenize, reading at most `limit` data rows
    pub fn tabulate(&self, text: &str, limit: Option<usize>) -> Tabulated {
        let data = strip_to_data(text);
        let dialect = self.detect_dialect(&data);
        tabulate(&data, &dialect, limit)
    }

    /// Tabulate the first `max_rows` data rows and suggest an X/Y mapping
    pub fn preview(&self, text: &str, max_rows: usize) -> DelimitedPreview {
        let Tabulated { table, issues } = self.tabulate(text, Some(max_rows));
        let mut warnings = issue_warnings(&issues);

        if table.rows.is_empty() {
            warnings.push(messages::NO_DATA_ROWS.to_string());
        }

        let analysis = ColumnAnalysis::analyze(&table);
        let suggestion = analysis.suggest_axes();
        warnings.extend(suggestion.warnings);
        debug!(
            "Column analysis: {} columns, {} numeric",
            analysis.columns.len(),
            analysis.numeric_indices.len()
        );

        let width = analysis.columns.len();
        let preview_rows = table
            .rows
            .iter()
            .map(|row| {
                (0..width)
                    .map(|i| TabularRows::cell(row, i).to_string())
                    .collect()
            })
            .collect();

        DelimitedPreview {
            x_unit_hint: unit_hint(&table.header, suggestion.x_index),
            y_unit_hint: unit_hint(&table.header, suggestion.y_index),
            columns: analysis.columns,
            preview_rows,
            suggested_x_index: suggestion.x_index,
            suggested_y_index: suggestion.y_index,
            table,
            warnings,
        }
    }

    /// Read every row and collect the numeric pairs at `x_index`/`y_index`
    pub fn extract_xy(&self, text: &str, x_index: usize, y_index: usize) -> DelimitedSeries {
        let Tabulated { table, issues } = self.tabulate(text, None);
        let mut warnings = issue_warnings(&issues);
        let mut stats = ExtractionStats::new();
        let mut x = Vec::new();
        let mut y = Vec::new();

        for row in &table.rows {
            stats.rows_read += 1;
            let xv = CellValue::parse(TabularRows::cell(row, x_index));
            let yv = CellValue::parse(TabularRows::cell(row, y_index));
            match (xv, yv) {
                (CellValue::Numeric(xv), CellValue::Numeric(yv)) => {
                    x.push(xv);
                    y.push(yv);
                    stats.pairs_parsed += 1;
                }
                (CellValue::Empty, _) | (_, CellValue::Empty) => stats.skipped_empty += 1,
                _ => stats.skipped_non_numeric += 1,
            }
        }

        if x.is_empty() {
            warnings.push(messages::NO_XY_PAIRS.to_string());
        }
        info!(
            "Extracted {} X/Y pairs from {} rows ({} skipped, {:.1}% usable)",
            stats.pairs_parsed,
            stats.rows_read,
            stats.rows_skipped(),
            stats.success_rate()
        );

        DelimitedSeries {
            delimiter: table.delimiter,
            has_header: table.has_header,
            x_unit_hint: unit_hint(&table.header, Some(x_index)),
            y_unit_hint: unit_hint(&table.header, Some(y_index)),
            header: table.header,
            x,
            y,
            stats,
            warnings,
        }
    }
}

/// Fold per-row read problems into warning lines
fn issue_warnings(issues: &[ParseIssue]) -> Vec<String> {
    issues
        .iter()
        .map(|issue| format!("Skipped unreadable row ({})", issue))
        .collect()
}
