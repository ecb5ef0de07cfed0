//! JCAMP-DX labelled-data-record header parsing
//!
//! Header records have the form `##KEY=value`. Keys are trimmed and
//! upper-cased; a later record with the same key replaces the earlier one.
//! The header ends at the first `##XYDATA` or `##PEAK TABLE` record; other
//! blocks such as `##XYPOINTS` are read through as ordinary records.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::models::{ParseIssue, parse_float};

static RECORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^##(?P<key>[^=]+)=(?P<value>.*)$").expect("record pattern is a valid regex")
});

/// Record tags that end the header (uppercase prefixes)
pub const DATA_BLOCK_TAGS: &[&str] = &["##XYDATA", "##PEAK TABLE"];

/// Parsed header records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JcampHeader {
    entries: BTreeMap<String, String>,
}

impl JcampHeader {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn into_entries(self) -> BTreeMap<String, String> {
        self.entries
    }

    /// Scale factor; absent, zero, non-finite or unparseable values mean 1.0
    pub fn factor(&self, key: &str) -> f64 {
        self.get(key)
            .and_then(parse_float)
            .filter(|f| f.is_finite() && *f != 0.0)
            .unwrap_or(1.0)
    }

    pub fn delta_x(&self) -> Option<f64> {
        self.get("DELTAX").and_then(parse_float)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("TITLE")
    }

    pub fn x_units(&self) -> Option<&str> {
        self.get("XUNITS")
    }

    pub fn y_units(&self) -> Option<&str> {
        self.get("YUNITS")
    }
}

/// Whether a trimmed line ends the header
pub fn is_data_block_tag(line: &str) -> bool {
    let upper = line.trim().to_ascii_uppercase();
    DATA_BLOCK_TAGS.iter().any(|tag| upper.starts_with(tag))
}

/// Parse one `##KEY=value` record
pub fn parse_record(line_number: usize, line: &str) -> Result<(String, String), ParseIssue> {
    let caps = RECORD
        .captures(line.trim())
        .ok_or_else(|| ParseIssue::at_line(line_number, "record has no '=' separator"))?;
    let key = caps["key"].trim().to_ascii_uppercase();
    if key.is_empty() {
        return Err(ParseIssue::at_line(line_number, "record has an empty label"));
    }
    Ok((key, caps["value"].trim().to_string()))
}

/// Parse header records up to the first data block.
///
/// Non-record lines are skipped; malformed records are returned as issues
/// and otherwise ignored.
pub fn parse_header(lines: &[&str]) -> (JcampHeader, Vec<ParseIssue>) {
    let mut header = JcampHeader::default();
    let mut issues = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if !trimmed.starts_with("##") {
            continue;
        }
        if is_data_block_tag(trimmed) {
            break;
        }
        match parse_record(index + 1, trimmed) {
            Ok((key, value)) => header.insert(key, value),
            Err(issue) => issues.push(issue),
        }
    }
    (header, issues)
}
