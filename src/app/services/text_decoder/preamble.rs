//! Preamble splitting and metadata extraction
//!
//! Two export styles are handled and combined:
//! - vendor exports that put a literal data marker line
//!   (`>>>>>Begin Spectral Data<<<<<`) between header and data
//! - files that open with a run of comment lines (`#`, `//`, `;`, `!`) or blanks

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

use crate::constants::{COMMENT_PREFIXES, MAX_METADATA_KEY_LEN, SPECTRAL_DATA_MARKER};
use crate::models::Preamble;

static METADATA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"^\s*(?P<key>[^:=]{{1,{}}})\s*[:=]\s*(?P<value>.+?)\s*$",
        MAX_METADATA_KEY_LEN
    );
    Regex::new(&pattern).expect("metadata pattern is a valid regex")
});

/// Split text into lines on `\n`, `\r\n` and bare `\r`
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Whether a line is the vendor data marker
pub fn is_data_marker(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(SPECTRAL_DATA_MARKER)
}

/// Whether a trimmed line belongs to a leading comment preamble
fn is_comment_or_blank(line: &str) -> bool {
    let stripped = line.trim();
    stripped.is_empty() || COMMENT_PREFIXES.iter().any(|p| stripped.starts_with(p))
}

/// Split at the first data marker line.
///
/// Returns the lines before the marker and the text after it with leading
/// newlines removed. Without a marker the preamble is empty and the text is
/// returned unchanged.
pub fn split_at_data_marker(text: &str) -> (Vec<String>, String) {
    let lines = split_lines(text);
    match lines.iter().position(|line| is_data_marker(line)) {
        Some(marker) => {
            let before = lines[..marker].iter().map(|s| s.to_string()).collect();
            let after = lines[marker + 1..].join("\n");
            (before, after.trim_start_matches('\n').to_string())
        }
        None => (Vec::new(), text.to_string()),
    }
}

/// Split off the maximal leading run of blank or comment lines
pub fn split_leading_comments(text: &str) -> (Vec<String>, String) {
    let lines = split_lines(text);
    match lines.iter().position(|line| !is_comment_or_blank(line)) {
        Some(first_data) => {
            let pre = lines[..first_data].iter().map(|s| s.to_string()).collect();
            (pre, lines[first_data..].join("\n"))
        }
        None => (lines.iter().map(|s| s.to_string()).collect(), String::new()),
    }
}

/// Extract `key: value` / `key = value` pairs; the first value per key wins
pub fn extract_metadata(lines: &[String]) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    for line in lines {
        let stripped = line.trim();
        if stripped.is_empty() || is_data_marker(stripped) {
            continue;
        }
        let Some(caps) = METADATA_LINE.captures(stripped) else {
            continue;
        };
        let key = caps["key"].trim();
        let value = caps["value"].trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        metadata
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }
    metadata
}

/// Collect the preamble of a text payload and the metadata found in it
pub fn extract_preamble(text: &str, max_lines: usize) -> Preamble {
    let (marker_preamble, after_marker) = split_at_data_marker(text);
    let (comment_preamble, _) = split_leading_comments(&after_marker);

    let mut lines = marker_preamble;
    lines.extend(comment_preamble);
    lines.truncate(max_lines);

    let metadata = extract_metadata(&lines);
    debug!(
        "Extracted preamble: {} lines, {} metadata keys",
        lines.len(),
        metadata.len()
    );

    Preamble { lines, metadata }
}

/// Text with the marker preamble and leading comment run removed
pub fn strip_to_data(text: &str) -> String {
    let (_, after_marker) = split_at_data_marker(text);
    let (_, data) = split_leading_comments(&after_marker);
    data
}
