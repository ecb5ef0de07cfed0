//! Column classification and axis suggestion for tabulated rows
//!
//! Every cell is classified once into a [`CellValue`]; a column's numeric
//! flag is a fold over its cells. A column is numeric when it holds at least
//! one non-empty cell and no cell fails to parse.

use super::tabulator::synthetic_name;
use crate::constants::messages;
use crate::models::{CellValue, ColumnInfo, TabularRows};

/// Column inventory of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAnalysis {
    pub columns: Vec<ColumnInfo>,

    /// Indices of numeric columns, ascending
    pub numeric_indices: Vec<usize>,
}

/// Suggested X/Y mapping with the ambiguity warnings it raised
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisSuggestion {
    pub x_index: Option<usize>,
    pub y_index: Option<usize>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
struct ColumnTally {
    seen_any: bool,
    non_numeric: usize,
}

impl ColumnTally {
    fn observe(mut self, cell: &CellValue) -> Self {
        match cell {
            CellValue::Empty => {}
            CellValue::Numeric(_) => self.seen_any = true,
            CellValue::Text(_) => {
                self.seen_any = true;
                self.non_numeric += 1;
            }
        }
        self
    }

    fn is_numeric(&self) -> bool {
        self.seen_any && self.non_numeric == 0
    }
}

impl ColumnAnalysis {
    /// Classify every column of the table
    pub fn analyze(table: &TabularRows) -> Self {
        let width = table.width();
        let mut columns = Vec::with_capacity(width);
        let mut numeric_indices = Vec::new();

        for index in 0..width {
            let tally = table
                .rows
                .iter()
                .map(|row| CellValue::parse(TabularRows::cell(row, index)))
                .fold(ColumnTally::default(), |tally, cell| tally.observe(&cell));

            if tally.is_numeric() {
                numeric_indices.push(index);
            }
            let name = table
                .header
                .get(index)
                .cloned()
                .unwrap_or_else(|| synthetic_name(index));
            columns.push(ColumnInfo {
                index,
                name,
                is_numeric: tally.is_numeric(),
                non_numeric_count: tally.non_numeric,
            });
        }

        Self {
            columns,
            numeric_indices,
        }
    }

    /// First two numeric columns by index, with warnings when ambiguous or short
    pub fn suggest_axes(&self) -> AxisSuggestion {
        match self.numeric_indices.as_slice() {
            [x, y, rest @ ..] => AxisSuggestion {
                x_index: Some(*x),
                y_index: Some(*y),
                warnings: if rest.is_empty() {
                    Vec::new()
                } else {
                    vec![messages::MULTIPLE_NUMERIC_COLUMNS.to_string()]
                },
            },
            [_] => AxisSuggestion {
                warnings: vec![messages::SINGLE_NUMERIC_COLUMN.to_string()],
                ..AxisSuggestion::default()
            },
            [] => AxisSuggestion {
                warnings: vec![messages::NO_NUMERIC_COLUMNS.to_string()],
                ..AxisSuggestion::default()
            },
        }
    }
}
