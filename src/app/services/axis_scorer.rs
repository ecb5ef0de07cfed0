//! Column-name heuristics for choosing X and Y axes
//!
//! All vocabularies live in [`crate::constants::axis_hints`] as
//! `(substring, weight)` tables; this module only folds them. Names are
//! matched case-insensitively after trimming.

use crate::constants::axis_hints::{
    BOOKKEEPING, ERROR_LIKE, ERROR_LIKE_PENALTY, TIME_LIKE, TIME_LIKE_PENALTY, X_HINTS, Y_HINTS,
};
use crate::models::AxisScore;

/// A column offered to the scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisCandidate<'a> {
    pub index: usize,
    pub name: &'a str,
    pub is_numeric: bool,
}

impl<'a> AxisCandidate<'a> {
    pub fn new(index: usize, name: &'a str, is_numeric: bool) -> Self {
        Self {
            index,
            name,
            is_numeric,
        }
    }
}

fn normalized(name: &str) -> String {
    name.trim().to_lowercase()
}

fn matches_any(name: &str, words: &[&str]) -> bool {
    let n = normalized(name);
    words.iter().any(|w| n.contains(w))
}

/// Sum of the weights of every hint contained in `name`
pub fn score_hints(name: &str, hints: &[(&str, i32)]) -> i32 {
    let n = normalized(name);
    hints
        .iter()
        .filter(|(hint, _)| n.contains(hint))
        .map(|(_, weight)| weight)
        .sum()
}

pub fn is_time_like(name: &str) -> bool {
    matches_any(name, TIME_LIKE)
}

pub fn is_error_like(name: &str) -> bool {
    matches_any(name, ERROR_LIKE)
}

/// Bookkeeping or uncertainty column that should never be a Y choice
pub fn is_bad_hinted(name: &str) -> bool {
    is_error_like(name) || BOOKKEEPING.iter().any(|(hint, _)| normalized(name).contains(hint))
}

pub fn x_score(name: &str) -> i32 {
    score_hints(name, X_HINTS)
}

/// Y score: flux-like hints, bookkeeping penalties, plus one-off penalties for
/// time-like and uncertainty-like names
pub fn y_score(name: &str) -> i32 {
    let mut score = score_hints(name, Y_HINTS) + score_hints(name, BOOKKEEPING);
    if is_time_like(name) {
        score += TIME_LIKE_PENALTY;
    }
    if is_error_like(name) {
        score += ERROR_LIKE_PENALTY;
    }
    score
}

/// Scores of every numeric candidate, in input order
pub fn score_columns(candidates: &[AxisCandidate<'_>]) -> Vec<AxisScore> {
    candidates
        .iter()
        .filter(|c| c.is_numeric)
        .map(|c| AxisScore {
            index: c.index,
            name: c.name.to_string(),
            x_score: x_score(c.name),
            y_score: y_score(c.name),
        })
        .collect()
}

/// Best positive score; ties keep the earliest candidate
fn best_positive<'a, I, F>(candidates: I, score: F) -> Option<usize>
where
    I: Iterator<Item = &'a AxisCandidate<'a>>,
    F: Fn(&str) -> i32,
{
    let mut best: Option<(usize, i32)> = None;
    for c in candidates {
        let s = score(c.name);
        if s > 0 && best.is_none_or(|(_, b)| s > b) {
            best = Some((c.index, s));
        }
    }
    best.map(|(index, _)| index)
}

/// Suggest X and Y column indices among the numeric candidates.
///
/// X is the best positive X score, else the first time-like numeric column,
/// else the first numeric column. Y falls back from the best positive Y score
/// among names that are neither time-like nor uncertainty-like, to the first
/// numeric name without time or bookkeeping hints, to any other numeric column.
pub fn suggest_xy(candidates: &[AxisCandidate<'_>]) -> (Option<usize>, Option<usize>) {
    let numeric: Vec<&AxisCandidate<'_>> = candidates.iter().filter(|c| c.is_numeric).collect();

    let x = best_positive(numeric.iter().copied(), x_score)
        .or_else(|| {
            numeric
                .iter()
                .find(|c| is_time_like(c.name))
                .map(|c| c.index)
        })
        .or_else(|| numeric.first().map(|c| c.index));

    let others: Vec<&AxisCandidate<'_>> = numeric
        .iter()
        .copied()
        .filter(|c| Some(c.index) != x)
        .collect();

    let y = best_positive(
        others
            .iter()
            .copied()
            .filter(|c| !is_time_like(c.name) && !is_error_like(c.name)),
        y_score,
    )
    .or_else(|| {
        others
            .iter()
            .find(|c| !is_time_like(c.name) && !is_bad_hinted(c.name))
            .map(|c| c.index)
    })
    .or_else(|| others.first().map(|c| c.index));

    (x, y)
}
