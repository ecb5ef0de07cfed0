//! JCAMP-DX parsing orchestration

use tracing::{debug, info};

use super::header::{JcampHeader, parse_header};
use super::xydata::{decode_block, find_data_block};
use crate::app::services::text_decoder::split_lines;
use crate::constants::messages;
use crate::models::normalize_unit;

/// Points and metadata decoded from a JCAMP-DX text
#[derive(Debug, Clone, PartialEq)]
pub struct JcampSpectrum {
    pub title: Option<String>,
    pub x_unit: Option<String>,
    pub y_unit: Option<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub header: JcampHeader,

    /// Data block label and layout, e.g. `XYDATA=(X++(Y..Y))`
    pub data_mode: Option<String>,

    pub warnings: Vec<String>,
}

/// Parse a decoded JCAMP-DX text.
///
/// Never fails: missing blocks, odd token counts and a missing DELTAX all
/// become warnings and whatever points were decoded are returned.
pub fn parse_jcamp(text: &str) -> JcampSpectrum {
    let lines = split_lines(text);
    let (header, issues) = parse_header(&lines);
    let mut warnings: Vec<String> = issues
        .iter()
        .map(|issue| format!("Ignored malformed JCAMP-DX record ({})", issue))
        .collect();

    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut data_mode = None;

    match find_data_block(&lines) {
        Some(block) => {
            if block.is_fallback {
                warnings.push(messages::JCAMP_NO_XYDATA.to_string());
                warnings.push(format!(
                    "Decoded ##{} block as (XY..XY) pairs instead.",
                    block.label
                ));
            }
            debug!(
                "JCAMP-DX data block {} {} at line {}",
                block.label, block.layout, block.first_line
            );
            let decoded = decode_block(&lines, &block, &header);
            warnings.extend(decoded.warnings);
            x = decoded.x;
            y = decoded.y;
            data_mode = Some(format!("{}={}", block.label, block.layout));
        }
        None => warnings.push(messages::JCAMP_NO_XYDATA.to_string()),
    }

    if x.is_empty() || y.is_empty() {
        warnings.push(messages::JCAMP_EMPTY.to_string());
    }
    if x.len() != y.len() {
        warnings.push(messages::JCAMP_LENGTH_MISMATCH.to_string());
        let n = x.len().min(y.len());
        x.truncate(n);
        y.truncate(n);
    }

    info!(
        "Parsed JCAMP-DX: {} points, {} header records",
        x.len(),
        header.len()
    );

    JcampSpectrum {
        title: normalize_unit(header.title()),
        x_unit: normalize_unit(header.x_units()),
        y_unit: normalize_unit(header.y_units()),
        x,
        y,
        header,
        data_mode,
        warnings,
    }
}
