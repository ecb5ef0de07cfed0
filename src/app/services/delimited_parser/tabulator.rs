//! Row tokenization for delimited text
//!
//! Comma, tab, semicolon and pipe files go through the `csv` reader with
//! double-quote quoting and ragged rows allowed. Space-delimited files are
//! split on runs of whitespace so aligned columns do not yield phantom empty
//! cells. Rows whose cells are all blank are skipped in both cases.

use csv::{ReaderBuilder, Trim};
use std::ops::ControlFlow;

use super::dialect::Dialect;
use crate::app::services::text_decoder::split_lines;
use crate::constants::SYNTHETIC_COLUMN_PREFIX;
use crate::models::{Delimiter, ParseIssue, TabularRows};

/// Tokenized rows plus the problems met while reading them
#[derive(Debug, Clone, PartialEq)]
pub struct Tabulated {
    pub table: TabularRows,
    pub issues: Vec<ParseIssue>,
}

/// Whether a row carries no content
fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Synthesized column name for a 0-based index
pub fn synthetic_name(index: usize) -> String {
    format!("{}{}", SYNTHETIC_COLUMN_PREFIX, index + 1)
}

/// Feed every non-blank row of `text` to `visit` until it breaks.
///
/// With `trim` set, cells are trimmed of surrounding whitespace. Records the
/// reader cannot decode are reported as issues and skipped.
pub fn for_each_row<F>(text: &str, delimiter: Delimiter, trim: bool, mut visit: F) -> Vec<ParseIssue>
where
    F: FnMut(Vec<String>) -> ControlFlow<()>,
{
    let mut issues = Vec::new();

    if delimiter == Delimiter::Space {
        for line in split_lines(text) {
            let row: Vec<String> = line.split_whitespace().map(str::to_string).collect();
            if row.is_empty() {
                continue;
            }
            if visit(row).is_break() {
                break;
            }
        }
        return issues;
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .flexible(true)
        .trim(if trim { Trim::All } else { Trim::None })
        .from_reader(text.as_bytes());

    for (index, record) in reader.records().enumerate() {
        match record {
            Ok(record) => {
                let row: Vec<String> = record.iter().map(str::to_string).collect();
                if row.is_empty() || is_blank_row(&row) {
                    continue;
                }
                if visit(row).is_break() {
                    break;
                }
            }
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(index + 1);
                issues.push(ParseIssue::at_line(line, e.to_string()));
            }
        }
    }
    issues
}

/// Header names from the first row; blank cells get synthesized names
fn name_header(row: Vec<String>) -> Vec<String> {
    row.into_iter()
        .enumerate()
        .map(|(i, cell)| {
            if cell.trim().is_empty() {
                synthetic_name(i)
            } else {
                cell
            }
        })
        .collect()
}

/// Tokenize cleaned text with a known dialect.
///
/// With `limit`, reading stops once that many data rows are collected. Without
/// a header row the names are synthesized to the widest row read.
pub fn tabulate(data: &str, dialect: &Dialect, limit: Option<usize>) -> Tabulated {
    let mut header: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();

    let issues = for_each_row(data, dialect.delimiter, true, |row| {
        if dialect.has_header && header.is_none() {
            header = Some(name_header(row));
            return ControlFlow::Continue(());
        }
        if limit.is_some_and(|max| rows.len() >= max) {
            return ControlFlow::Break(());
        }
        rows.push(row);
        ControlFlow::Continue(())
    });

    let header = header.unwrap_or_else(|| {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        (0..width).map(synthetic_name).collect()
    });

    Tabulated {
        table: TabularRows {
            delimiter: dialect.delimiter,
            has_header: dialect.has_header,
            header,
            rows,
        },
        issues,
    }
}
