//! Extraction statistics and result structures for delimited text
//!
//! This module provides the preview and full-extraction results handed back
//! to the ingest engine, plus counters describing how many rows survived.

use crate::models::{ColumnInfo, Delimiter, TabularRows};

/// Bounded preview of a delimited payload with its suggested mapping
#[derive(Debug, Clone, PartialEq)]
pub struct DelimitedPreview {
    /// Header and sampled rows as tokenized
    pub table: TabularRows,

    pub columns: Vec<ColumnInfo>,

    /// Sampled rows padded to the column count
    pub preview_rows: Vec<Vec<String>>,

    pub suggested_x_index: Option<usize>,
    pub suggested_y_index: Option<usize>,
    pub x_unit_hint: Option<String>,
    pub y_unit_hint: Option<String>,
    pub warnings: Vec<String>,
}

/// Raw X/Y pairs read from every row of a delimited payload
#[derive(Debug, Clone, PartialEq)]
pub struct DelimitedSeries {
    pub delimiter: Delimiter,
    pub has_header: bool,
    pub header: Vec<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub x_unit_hint: Option<String>,
    pub y_unit_hint: Option<String>,
    pub stats: ExtractionStats,
    pub warnings: Vec<String>,
}

/// Row counters for a full X/Y extraction
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExtractionStats {
    /// Non-blank data rows read
    pub rows_read: usize,

    /// Rows that yielded an X/Y pair
    pub pairs_parsed: usize,

    /// Rows where the X or Y cell was empty or missing
    pub skipped_empty: usize,

    /// Rows where the X or Y cell did not parse as a number
    pub skipped_non_numeric: usize,
}

impl ExtractionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows_skipped(&self) -> usize {
        self.skipped_empty + self.skipped_non_numeric
    }

    /// Share of rows that produced a pair, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.rows_read == 0 {
            0.0
        } else {
            (self.pairs_parsed as f64 / self.rows_read as f64) * 100.0
        }
    }
}
