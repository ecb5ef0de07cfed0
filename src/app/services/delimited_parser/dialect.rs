//! Delimiter and header-presence sniffing
//!
//! The delimiter is chosen from a bounded text sample. A candidate is accepted
//! when the most common number of occurrences per line is non-zero and shared
//! by enough lines; among accepted candidates the earliest in preference order
//! wins. When no candidate is consistent, the most frequent character of a
//! smaller set is used instead and header detection is skipped.

use std::ops::ControlFlow;
use tracing::debug;

use super::tabulator::for_each_row;
use crate::app::services::text_decoder::split_lines;
use crate::constants::{DELIMITER_CONSISTENCY_THRESHOLD, FALLBACK_DELIMITERS, SNIFF_DELIMITERS};
use crate::models::{Delimiter, parse_float};

/// Delimiter decision for a delimited-text payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: Delimiter,
    pub has_header: bool,

    /// False when the delimiter came from the frequency fallback
    pub sniffed: bool,
}

/// Longest prefix of `text` no larger than `max_bytes`, cut on a char boundary
pub fn sample_text(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Full dialect decision for a sample of cleaned text
pub fn sniff_dialect(sample: &str, header_rows: usize) -> Dialect {
    match sniff_delimiter(sample) {
        Some(delimiter) => {
            let has_header = sniff_header(sample, delimiter, header_rows);
            debug!(
                "Sniffed delimiter {:?} (header: {})",
                delimiter.as_char(),
                has_header
            );
            Dialect {
                delimiter,
                has_header,
                sniffed: true,
            }
        }
        None => {
            let delimiter = fallback_delimiter(sample);
            debug!(
                "No consistent delimiter; falling back to {:?}",
                delimiter.as_char()
            );
            Dialect {
                delimiter,
                has_header: false,
                sniffed: false,
            }
        }
    }
}

/// Consistent delimiter in the sample, if any
pub fn sniff_delimiter(sample: &str) -> Option<Delimiter> {
    let lines: Vec<&str> = split_lines(sample)
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return None;
    }

    SNIFF_DELIMITERS
        .iter()
        .copied()
        .find(|&candidate| {
            let (mode, agreeing) = count_mode(&lines, candidate);
            mode > 0 && agreeing as f64 / lines.len() as f64 >= DELIMITER_CONSISTENCY_THRESHOLD
        })
        .and_then(Delimiter::from_char)
}

/// Separators `candidate` contributes to a line. Space counts runs of
/// whitespace between fields so padded columns give a stable count.
fn separator_count(line: &str, candidate: char) -> usize {
    if candidate == ' ' {
        line.split_whitespace().count().saturating_sub(1)
    } else {
        line.matches(candidate).count()
    }
}

/// Most common per-line count of `candidate` and the number of lines sharing it.
/// Ties go to the count seen first.
fn count_mode(lines: &[&str], candidate: char) -> (usize, usize) {
    let mut tally: Vec<(usize, usize)> = Vec::new();
    for line in lines {
        let count = separator_count(line, candidate);
        match tally.iter_mut().find(|(c, _)| *c == count) {
            Some((_, freq)) => *freq += 1,
            None => tally.push((count, 1)),
        }
    }
    tally
        .into_iter()
        .rev()
        .max_by_key(|&(_, freq)| freq)
        .unwrap_or((0, 0))
}

/// Most frequent fallback delimiter in the sample, comma when none occurs
pub fn fallback_delimiter(sample: &str) -> Delimiter {
    let mut best = (',', 0usize);
    for &candidate in FALLBACK_DELIMITERS {
        let count = sample.matches(candidate).count();
        if count > best.1 {
            best = (candidate, count);
        }
    }
    Delimiter::from_char(best.0).unwrap_or(Delimiter::Comma)
}

/// Per-column type observed while sniffing for a header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Numeric,
    Length(usize),
}

impl CellKind {
    fn of(cell: &str) -> Self {
        if parse_float(cell).is_some() {
            CellKind::Numeric
        } else {
            CellKind::Length(cell.chars().count())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnVote {
    Unseen,
    Typed(CellKind),
    Inconsistent,
}

/// Decide whether the first row of the sample is a header.
///
/// Each column gets a type from the following rows of the same width: numeric,
/// or the length of its text. Columns with inconsistent types are ignored. The
/// first row votes header for every column it disagrees with and against for
/// every column it matches.
pub fn sniff_header(sample: &str, delimiter: Delimiter, rows_to_check: usize) -> bool {
    let mut first: Option<Vec<String>> = None;
    let mut votes: Vec<ColumnVote> = Vec::new();
    let mut checked = 0;

    for_each_row(sample, delimiter, false, |row| {
        if first.is_none() {
            votes = vec![ColumnVote::Unseen; row.len()];
            first = Some(row);
            return ControlFlow::Continue(());
        }
        if checked >= rows_to_check {
            return ControlFlow::Break(());
        }
        checked += 1;
        if row.len() != votes.len() {
            return ControlFlow::Continue(());
        }
        for (vote, cell) in votes.iter_mut().zip(&row) {
            let kind = CellKind::of(cell);
            *vote = match *vote {
                ColumnVote::Unseen => ColumnVote::Typed(kind),
                ColumnVote::Typed(prev) if prev == kind => ColumnVote::Typed(prev),
                _ => ColumnVote::Inconsistent,
            };
        }
        ControlFlow::Continue(())
    });

    let Some(header) = first else {
        return false;
    };

    let score: i64 = votes
        .iter()
        .zip(&header)
        .map(|(vote, cell)| match vote {
            ColumnVote::Inconsistent => 0,
            ColumnVote::Unseen => 1,
            ColumnVote::Typed(CellKind::Length(len)) if cell.chars().count() == *len => -1,
            ColumnVote::Typed(CellKind::Numeric) if parse_float(cell).is_some() => -1,
            ColumnVote::Typed(_) => 1,
        })
        .sum();
    score > 0
}
