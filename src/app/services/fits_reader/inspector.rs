//! Table candidates, HDU choice, previews and X/Y extraction

use tracing::{debug, info};

use super::hdu::FitsFile;
use super::table::Table;
use crate::app::services::axis_scorer::{AxisCandidate, suggest_xy};
use crate::constants::{messages, preferred_hdu};
use crate::models::{ColumnInfo, FitsTableCandidate};
use crate::Result;

/// Preview of the chosen table HDU
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitsPreview {
    pub hdu_index: Option<usize>,
    pub candidates: Vec<FitsTableCandidate>,
    pub columns: Vec<ColumnInfo>,
    pub preview_rows: Vec<Vec<String>>,
    pub suggested_x_index: Option<usize>,
    pub suggested_y_index: Option<usize>,
    pub x_unit_hint: Option<String>,
    pub y_unit_hint: Option<String>,
    pub warnings: Vec<String>,
}

/// Raw X/Y columns pulled from a table, before canonicalization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitsSeries {
    pub hdu_index: Option<usize>,
    pub hdu_name: Option<String>,
    pub x_index: Option<usize>,
    pub y_index: Option<usize>,
    pub x_col: Option<String>,
    pub y_col: Option<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub x_unit: Option<String>,
    pub y_unit: Option<String>,

    /// Cells coerced to NaN because they were not numeric
    pub coerced: usize,

    pub warnings: Vec<String>,
}

/// Whether an HDU name marks the science spectrum
pub fn is_preferred_name(name: &str) -> bool {
    let upper = name.trim().to_uppercase();
    preferred_hdu::CONTAINS.iter().any(|s| upper.contains(s))
        || preferred_hdu::EXACT.iter().any(|s| upper == *s)
}

fn axis_candidates<'t>(table: &'t Table<'_>) -> Vec<AxisCandidate<'t>> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| AxisCandidate::new(i, &c.name, c.format.is_numeric()))
        .collect()
}

/// Suggested X/Y column indices for one table
pub fn suggest_table_axes(table: &Table<'_>) -> (Option<usize>, Option<usize>) {
    suggest_xy(&axis_candidates(table))
}

/// Column inventory of a table; FITS columns are typed, so the numeric
/// verdict comes from the format rather than from sampled cells
pub fn table_columns(table: &Table<'_>) -> Vec<ColumnInfo> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(index, c)| ColumnInfo {
            index,
            name: c.name.clone(),
            is_numeric: c.format.is_numeric(),
            non_numeric_count: 0,
        })
        .collect()
}

/// Every readable table HDU of one FITS payload
#[derive(Debug, Clone)]
pub struct FitsInspector<'a> {
    tables: Vec<Table<'a>>,
    warnings: Vec<String>,
}

impl<'a> FitsInspector<'a> {
    /// Walk the file and lay out every table HDU.
    ///
    /// Fails only when the primary header cannot be read. Tables whose
    /// layout is invalid are skipped with a warning.
    pub fn open(file_name: &str, bytes: &'a [u8]) -> Result<Self> {
        let mut file = FitsFile::parse(file_name, bytes)?;
        let mut warnings = std::mem::take(&mut file.warnings);
        let mut tables = Vec::new();

        for hdu in file.hdus.iter().filter(|h| h.kind.is_table()) {
            match Table::from_hdu(hdu, file.data(hdu)) {
                Ok(table) => {
                    if table.is_truncated() {
                        warnings.push(format!(
                            "FITS HDU {} is truncated; read {} of {} rows.",
                            hdu.index, table.rows_available, table.nrows
                        ));
                    }
                    tables.push(table);
                }
                Err(issue) => {
                    debug!("Skipping HDU {} of {}: {}", hdu.index, file_name, issue);
                    warnings.push(format!("Skipped FITS HDU {} ({}).", hdu.index, issue));
                }
            }
        }

        info!(
            "FITS {}: {} HDUs, {} table candidates",
            file_name,
            file.hdus.len(),
            tables.len()
        );
        Ok(Self { tables, warnings })
    }

    pub fn tables(&self) -> &[Table<'a>] {
        &self.tables
    }

    /// Warnings raised while walking the file
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Table HDUs with their columns and per-table axis suggestions
    pub fn candidates(&self) -> Vec<FitsTableCandidate> {
        self.tables
            .iter()
            .map(|table| {
                let (x, y) = suggest_table_axes(table);
                FitsTableCandidate {
                    hdu_index: table.hdu_index,
                    hdu_name: table.hdu_name.clone(),
                    columns: table.column_names(),
                    suggested_x_index: x,
                    suggested_y_index: y,
                }
            })
            .collect()
    }

    /// Pick the table to read.
    ///
    /// A requested index wins when it names a table; otherwise the first
    /// science-named table, otherwise the first table. `warn_multiple` adds
    /// the confirmation warning when several tables exist.
    pub fn choose(
        &self,
        requested: Option<usize>,
        warn_multiple: bool,
        warnings: &mut Vec<String>,
    ) -> Option<&Table<'a>> {
        if self.tables.is_empty() {
            warnings.push(messages::NO_FITS_TABLES.to_string());
            return None;
        }

        let mut chosen = None;
        if let Some(n) = requested {
            chosen = self.tables.iter().find(|t| t.hdu_index == n);
            if chosen.is_none() {
                warnings.push(format!(
                    "Requested hdu_index={} not found; using best-effort choice.",
                    n
                ));
            }
        }
        let explicit = chosen.is_some();
        let chosen = chosen
            .or_else(|| self.tables.iter().find(|t| is_preferred_name(&t.hdu_name)))
            .or_else(|| self.tables.first());

        if self.tables.len() > 1 && (warn_multiple || !explicit) {
            warnings.push(messages::MULTIPLE_FITS_TABLES.to_string());
        }
        chosen
    }

    /// Preview the chosen table
    pub fn preview(&self, requested: Option<usize>, max_rows: usize) -> FitsPreview {
        let mut warnings = self.warnings.clone();
        let candidates = self.candidates();
        let Some(table) = self.choose(requested, true, &mut warnings) else {
            return FitsPreview {
                candidates,
                warnings,
                ..FitsPreview::default()
            };
        };

        let (x, y) = suggest_table_axes(table);
        if x.is_none() || y.is_none() {
            warnings.push(messages::FITS_XY_UNCERTAIN.to_string());
        }

        let preview_rows = (0..table.rows_available.min(max_rows))
            .map(|row| {
                (0..table.columns.len())
                    .map(|col| {
                        table
                            .read_cell(row, col)
                            .map(|cell| cell.render())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        let unit_of = |index: Option<usize>| {
            index
                .and_then(|i| table.columns.get(i))
                .and_then(|c| c.unit.clone())
        };

        FitsPreview {
            hdu_index: Some(table.hdu_index),
            candidates,
            columns: table_columns(table),
            preview_rows,
            suggested_x_index: x,
            suggested_y_index: y,
            x_unit_hint: unit_of(x),
            y_unit_hint: unit_of(y),
            warnings,
        }
    }

    /// Read X and Y from the chosen table.
    ///
    /// Missing indices fall back to the table's suggestion. Cells are
    /// flattened row by row, so vector and heap columns yield every element.
    pub fn extract_xy(
        &self,
        requested: Option<usize>,
        x_index: Option<usize>,
        y_index: Option<usize>,
    ) -> FitsSeries {
        let mut warnings = self.warnings.clone();
        let Some(table) = self.choose(requested, false, &mut warnings) else {
            return FitsSeries {
                warnings,
                ..FitsSeries::default()
            };
        };

        let mut series = FitsSeries {
            hdu_index: Some(table.hdu_index),
            hdu_name: Some(table.hdu_name.clone()),
            ..FitsSeries::default()
        };

        let (suggested_x, suggested_y) = suggest_table_axes(table);
        let (Some(xi), Some(yi)) = (x_index.or(suggested_x), y_index.or(suggested_y)) else {
            warnings.push(messages::NO_COLUMN_MAPPING.to_string());
            series.warnings = warnings;
            return series;
        };
        series.x_index = Some(xi);
        series.y_index = Some(yi);

        let (Some(x_column), Some(y_column)) = (table.columns.get(xi), table.columns.get(yi)) else {
            warnings.push(format!(
                "Column index out of range for FITS HDU {} ({} columns); selected x={}, y={}.",
                table.hdu_index,
                table.columns.len(),
                xi,
                yi
            ));
            series.warnings = warnings;
            return series;
        };

        let x_values = table.read_column(xi);
        let y_values = table.read_column(yi);
        let coerced = x_values.coerced + y_values.coerced;
        if coerced > 0 {
            warnings.push(format!(
                "Coerced {} non-numeric FITS values to NaN.",
                coerced
            ));
        }
        let unreadable = x_values.unreadable_cells + y_values.unreadable_cells;
        if unreadable > 0 {
            warnings.push(format!(
                "Skipped {} FITS cells whose variable-length data lies outside the file.",
                unreadable
            ));
        }

        debug!(
            "Extracted {} x / {} y values from HDU {} ({}, {})",
            x_values.values.len(),
            y_values.values.len(),
            table.hdu_index,
            x_column.name,
            y_column.name
        );

        series.x_col = Some(x_column.name.clone());
        series.y_col = Some(y_column.name.clone());
        series.x_unit = x_column.unit.clone();
        series.y_unit = y_column.unit.clone();
        series.x = x_values.values;
        series.y = y_values.values;
        series.coerced = coerced;
        series.warnings = warnings;
        series
    }
}
