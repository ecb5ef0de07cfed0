//! Canonical X/Y ordering and finite-value filtering
//!
//! Every parser path ends here. The pass truncates to equal length, drops
//! pairs with a non-finite coordinate, and then orders X: a non-increasing
//! axis is reversed and a non-monotonic axis is stable-sorted. Equal
//! neighbours never trigger a reorder. Running the pass on its own output
//! changes nothing.

use std::cmp::Ordering;
use tracing::debug;

use crate::constants::{MIN_POINTS_FOR_ORDERING, messages};
use crate::models::CanonicalAction;

/// Direction of an X sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Monotonicity {
    NonDecreasing,
    NonIncreasing,
    NonMonotonic,
}

/// Output of a canonicalization pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub action: CanonicalAction,
    pub dropped_nonfinite: usize,

    /// Points removed by truncating the longer array
    pub truncated: usize,

    pub warnings: Vec<String>,
}

/// Classify X; fewer than three points are not classified.
///
/// A constant sequence is non-decreasing, so it is never reordered.
pub fn classify(values: &[f64]) -> Option<Monotonicity> {
    if values.len() < MIN_POINTS_FOR_ORDERING {
        return None;
    }
    let non_decreasing = values.windows(2).all(|w| w[0] <= w[1]);
    if non_decreasing {
        return Some(Monotonicity::NonDecreasing);
    }
    let non_increasing = values.windows(2).all(|w| w[0] >= w[1]);
    if non_increasing {
        Some(Monotonicity::NonIncreasing)
    } else {
        Some(Monotonicity::NonMonotonic)
    }
}

/// Run the full pass over owned X/Y arrays
pub fn canonicalize(mut x: Vec<f64>, mut y: Vec<f64>) -> CanonicalSeries {
    let mut warnings = Vec::new();

    let truncated = x.len().abs_diff(y.len());
    if truncated > 0 {
        let n = x.len().min(y.len());
        x.truncate(n);
        y.truncate(n);
        warnings.push(format!(
            "X and Y lengths differed; truncated to {} points.",
            n
        ));
    }

    let before = x.len();
    let (mut x, mut y): (Vec<f64>, Vec<f64>) = x
        .into_iter()
        .zip(y)
        .filter(|(xv, yv)| xv.is_finite() && yv.is_finite())
        .unzip();
    let dropped_nonfinite = before - x.len();
    if dropped_nonfinite > 0 {
        warnings.push(format!(
            "Dropped {} points with non-finite X or Y values.",
            dropped_nonfinite
        ));
    }

    let action = match classify(&x) {
        Some(Monotonicity::NonIncreasing) => {
            x.reverse();
            y.reverse();
            warnings.push(messages::AXIS_REVERSED.to_string());
            CanonicalAction::Reversed
        }
        Some(Monotonicity::NonMonotonic) => {
            let mut pairs: Vec<(f64, f64)> = x.into_iter().zip(y).collect();
            // Values are finite here, so partial_cmp never fails
            pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
            (x, y) = pairs.into_iter().unzip();
            warnings.push(messages::AXIS_SORTED.to_string());
            CanonicalAction::Sorted
        }
        Some(Monotonicity::NonDecreasing) | None => CanonicalAction::None,
    };

    debug!(
        "Canonicalized {} points: action={}, dropped={}, truncated={}",
        x.len(),
        action,
        dropped_nonfinite,
        truncated
    );

    CanonicalSeries {
        x,
        y,
        action,
        dropped_nonfinite,
        truncated,
        warnings,
    }
}
