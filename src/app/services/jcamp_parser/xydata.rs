//! JCAMP-DX data block decoding
//!
//! Two layouts are decoded:
//! - `(X++(Y..Y))`: each line starts with an X value followed by Y values on a
//!   uniform grid of `DELTAX * XFACTOR`
//! - `(XY..XY)`: alternating X/Y values
//!
//! Values are scaled by `XFACTOR`/`YFACTOR`. The block ends at the next `##`
//! record. Compressed (ASDF) encodings are not decoded; their tokens do not
//! parse as numbers and are skipped.

use tracing::{debug, warn};

use super::header::JcampHeader;
use crate::constants::messages;
use crate::models::{ParseIssue, parse_float};

/// Layout of the values in a data block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XyMode {
    /// `(X++(Y..Y))`
    XIncrement,
    /// `(XY..XY)`
    Pairs,
}

/// How X values of an `(X++(Y..Y))` line are produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridExpansion {
    /// Y values sit on `x0 + k * step`
    Uniform { step: f64 },

    /// DELTAX is missing, so the grid is unanchored: only the first point of
    /// each line is kept
    FirstPointOnly,
}

/// Located data block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlock {
    /// Record label, uppercase (`XYDATA`, `XYPOINTS`, `PEAK TABLE`)
    pub label: String,

    /// Record value as written, e.g. `(X++(Y..Y))`
    pub layout: String,

    pub mode: XyMode,

    /// Index of the first line after the block record
    pub first_line: usize,

    /// True when no `##XYDATA` block exists and a point table is used instead
    pub is_fallback: bool,
}

/// Decoded points of one block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockDecode {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub expansion: Option<GridExpansion>,
    pub issues: Vec<ParseIssue>,
    pub warnings: Vec<String>,
}

/// Numbers on a data line; commas separate like whitespace, other tokens are skipped
pub fn tokenize_numbers(line: &str) -> Vec<f64> {
    line.replace(',', " ")
        .split_whitespace()
        .filter_map(parse_float)
        .collect()
}

fn block_at(lines: &[&str], tags: &[&str], is_fallback: bool) -> Option<DataBlock> {
    lines
        .iter()
        .enumerate()
        .find_map(|(index, line)| {
            let trimmed = line.trim();
            let upper = trimmed.to_ascii_uppercase();
            let tag = tags.iter().find(|tag| upper.starts_with(*tag))?;
            let label = tag.trim_start_matches('#').to_string();
            let layout = trimmed
                .split_once('=')
                .map(|(_, value)| value.trim().to_string())
                .unwrap_or_default();
            let mode = if !is_fallback && upper.contains("X++") {
                XyMode::XIncrement
            } else {
                XyMode::Pairs
            };
            Some(DataBlock {
                label,
                layout,
                mode,
                first_line: index + 1,
                is_fallback,
            })
        })
}

/// Find the first `##XYDATA` block, else a `##XYPOINTS` or `##PEAK TABLE`
/// block to read as pairs
pub fn find_data_block(lines: &[&str]) -> Option<DataBlock> {
    block_at(lines, &["##XYDATA"], false)
        .or_else(|| block_at(lines, &["##XYPOINTS", "##PEAK TABLE"], true))
}

/// Decode the lines of a block with the header's scale factors
pub fn decode_block(lines: &[&str], block: &DataBlock, header: &JcampHeader) -> BlockDecode {
    let xfactor = header.factor("XFACTOR");
    let yfactor = header.factor("YFACTOR");
    let mut decode = BlockDecode::default();

    if block.mode == XyMode::XIncrement {
        let expansion = match header.delta_x() {
            Some(delta) => GridExpansion::Uniform {
                step: delta * xfactor,
            },
            None => {
                warn!("X++ data without DELTAX; keeping one point per line");
                decode.warnings.push(messages::JCAMP_MISSING_DELTAX.to_string());
                GridExpansion::FirstPointOnly
            }
        };
        decode.expansion = Some(expansion);
    }

    for (offset, line) in lines.iter().enumerate().skip(block.first_line) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with("##") {
            break;
        }
        let nums = tokenize_numbers(trimmed);
        let Some((&first, rest)) = nums.split_first() else {
            continue;
        };

        match decode.expansion {
            Some(GridExpansion::Uniform { step }) => {
                let x0 = first * xfactor;
                for (k, yv) in rest.iter().enumerate() {
                    decode.x.push(x0 + k as f64 * step);
                    decode.y.push(yv * yfactor);
                }
            }
            Some(GridExpansion::FirstPointOnly) => {
                if let Some(yv) = rest.first() {
                    decode.x.push(first * xfactor);
                    decode.y.push(yv * yfactor);
                }
            }
            None => {
                if nums.len() % 2 != 0 {
                    decode.issues.push(ParseIssue::at_line(
                        offset + 1,
                        messages::JCAMP_ODD_TOKENS,
                    ));
                }
                for pair in nums.chunks_exact(2) {
                    decode.x.push(pair[0] * xfactor);
                    decode.y.push(pair[1] * yfactor);
                }
            }
        }
    }

    if !decode.issues.is_empty() {
        debug!("{} XYDATA lines had an odd token count", decode.issues.len());
        decode.warnings.push(messages::JCAMP_ODD_TOKENS.to_string());
    }
    decode
}
