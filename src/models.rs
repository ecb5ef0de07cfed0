//! Core data structures and types for spectral ingestion.
//!
//! Every value here is created fresh per ingestion call. Nothing is shared
//! across calls and nothing is mutated by more than one owner.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::{Error, Result};

/// Raw upload handed to the engine: immutable bytes plus the declared filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPayload {
    file_name: String,
    bytes: Vec<u8>,
}

impl RawPayload {
    /// Wrap already-read bytes
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, rejecting it when larger than `limit` bytes
    pub fn from_path(path: &Path, limit: usize) -> Result<Self> {
        let size = std::fs::metadata(path)
            .map_err(|e| Error::io(format!("Failed to stat {}", path.display()), e))?
            .len() as usize;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        if size > limit {
            return Err(Error::input_too_large(file_name, size, limit));
        }
        let bytes = std::fs::read(path)
            .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;
        Ok(Self { file_name, bytes })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Parser identity reported on every result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParserKind {
    #[serde(rename = "fits")]
    Fits,
    #[serde(rename = "jcamp-dx")]
    JcampDx,
    #[serde(rename = "delimited-text")]
    DelimitedText,
}

impl ParserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParserKind::Fits => "fits",
            ParserKind::JcampDx => "jcamp-dx",
            ParserKind::DelimitedText => "delimited-text",
        }
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoding chosen when decoding a text payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "utf-8-sig")]
    Utf8Sig,
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "latin-1")]
    Latin1,
    /// Binary container, not decoded as text
    #[serde(rename = "binary")]
    Binary,
}

impl TextEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Binary => "binary",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text plus the encoding that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: TextEncoding,
}

/// Leading instrument-header lines and the metadata extracted from them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preamble {
    /// Up to the configured cap of leading lines, in file order
    pub lines: Vec<String>,

    /// Trimmed key to trimmed value; first occurrence wins on collision
    pub metadata: BTreeMap<String, String>,
}

impl Preamble {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.metadata.is_empty()
    }

    /// Lines as an optional payload field (absent when empty)
    pub fn lines_or_none(&self) -> Option<Vec<String>> {
        (!self.lines.is_empty()).then(|| self.lines.clone())
    }

    /// Metadata as an optional payload field (absent when empty)
    pub fn metadata_or_none(&self) -> Option<BTreeMap<String, String>> {
        (!self.metadata.is_empty()).then(|| self.metadata.clone())
    }
}

/// Field delimiter of a delimited-text payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Comma,
    Tab,
    Semicolon,
    Pipe,
    Space,
}

impl Delimiter {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ',' => Some(Delimiter::Comma),
            '\t' => Some(Delimiter::Tab),
            ';' => Some(Delimiter::Semicolon),
            '|' => Some(Delimiter::Pipe),
            ' ' => Some(Delimiter::Space),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Semicolon => ';',
            Delimiter::Pipe => '|',
            Delimiter::Space => ' ',
        }
    }

    pub fn as_byte(&self) -> u8 {
        self.as_char() as u8
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Serialize for Delimiter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Delimiter {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Delimiter::from_char(c)
                .ok_or_else(|| serde::de::Error::custom(format!("unsupported delimiter {:?}", s))),
            _ => Err(serde::de::Error::custom(format!(
                "delimiter must be one character, got {:?}",
                s
            ))),
        }
    }
}

/// Tokenized delimited text
#[derive(Debug, Clone, PartialEq)]
pub struct TabularRows {
    pub delimiter: Delimiter,
    pub has_header: bool,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TabularRows {
    /// Width of the widest data row, or of the header when there are no rows
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(self.header.len())
    }

    /// Cell at `index`, or the empty string for short rows
    pub fn cell<'a>(row: &'a [String], index: usize) -> &'a str {
        row.get(index).map(String::as_str).unwrap_or("")
    }
}

/// A single cell classified once
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Numeric(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// Classify a trimmed cell
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        match parse_float(trimmed) {
            Some(v) => CellValue::Numeric(v),
            None => CellValue::Text(trimmed.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Numeric(v) => Some(*v),
            _ => None,
        }
    }
}

/// Lenient float parsing for instrument exports.
///
/// Accepts everything `f64::from_str` does plus a leading/trailing whitespace
/// and digit-group underscores between digits (`1_000.5`).
pub fn parse_float(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }
    if s.contains('_') {
        let bytes = s.as_bytes();
        let well_placed = bytes.iter().enumerate().all(|(i, &b)| {
            b != b'_'
                || (i > 0
                    && i + 1 < bytes.len()
                    && bytes[i - 1].is_ascii_digit()
                    && bytes[i + 1].is_ascii_digit())
        });
        if well_placed {
            return s.replace('_', "").parse::<f64>().ok();
        }
    }
    None
}

/// Column inventory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub index: usize,
    pub name: String,
    pub is_numeric: bool,
    pub non_numeric_count: usize,
}

/// Heuristic axis scores of one numeric column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisScore {
    pub index: usize,
    pub name: String,
    pub x_score: i32,
    pub y_score: i32,
}

/// A FITS HDU that exposes table columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitsTableCandidate {
    pub hdu_index: usize,
    pub hdu_name: String,
    pub columns: Vec<String>,
    pub suggested_x_index: Option<usize>,
    pub suggested_y_index: Option<usize>,
}

/// Reordering applied by the canonicalizer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalAction {
    #[default]
    None,
    Reversed,
    Sorted,
}

impl fmt::Display for CanonicalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CanonicalAction::None => "none",
            CanonicalAction::Reversed => "reversed",
            CanonicalAction::Sorted => "sorted",
        };
        f.write_str(s)
    }
}

/// Record of what the parser decided while producing a series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParserDecisions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<TextEncoding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<Delimiter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_header: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hdu_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hdu_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_col: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_col: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jcamp_header: Option<BTreeMap<String, String>>,
    pub canonicalization: CanonicalAction,
    pub dropped_nonfinite: usize,
    pub non_numeric_coerced: usize,
}

/// Canonical output of a commit call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSeries {
    pub source_file_name: String,
    pub parser: ParserKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub parser_decisions: ParserDecisions,
    pub x_unit: Option<String>,
    pub y_unit: Option<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub x_count: usize,
    pub warnings: Vec<String>,
    pub source_preamble: Option<Vec<String>>,
    pub source_metadata: Option<BTreeMap<String, String>>,
}

impl ParsedSeries {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Result of a preview call: everything a user needs to confirm a mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestPreview {
    pub file_name: String,
    pub file_size_bytes: usize,
    pub encoding: TextEncoding,
    pub parser: ParserKind,
    pub delimiter: Option<Delimiter>,
    pub has_header: bool,
    pub hdu_index: Option<usize>,
    pub fits_hdu_candidates: Option<Vec<FitsTableCandidate>>,
    pub x_unit_hint: Option<String>,
    pub y_unit_hint: Option<String>,
    pub columns: Vec<ColumnInfo>,
    pub axis_scores: Vec<AxisScore>,
    pub preview_rows: Vec<Vec<String>>,
    pub suggested_x_index: Option<usize>,
    pub suggested_y_index: Option<usize>,
    pub warnings: Vec<String>,
    pub source_preamble: Option<Vec<String>>,
    pub source_metadata: Option<BTreeMap<String, String>>,
}

/// Options for a preview call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Overrides the configured preview row count
    pub max_rows: Option<usize>,

    /// Requested FITS HDU
    pub hdu_index: Option<usize>,
}

/// Confirmed column mapping for a commit call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSelection {
    pub x_index: Option<usize>,
    pub y_index: Option<usize>,
    pub hdu_index: Option<usize>,
    pub x_unit: Option<String>,
    pub y_unit: Option<String>,
}

impl ColumnSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(mut self, x_index: usize, y_index: usize) -> Self {
        self.x_index = Some(x_index);
        self.y_index = Some(y_index);
        self
    }

    pub fn with_hdu(mut self, hdu_index: usize) -> Self {
        self.hdu_index = Some(hdu_index);
        self
    }

    pub fn with_units(mut self, x_unit: Option<String>, y_unit: Option<String>) -> Self {
        self.x_unit = x_unit;
        self.y_unit = y_unit;
        self
    }

    /// Both axes explicitly chosen
    pub fn has_columns(&self) -> bool {
        self.x_index.is_some() && self.y_index.is_some()
    }
}

/// Problem with a single item (line, row, cell, header card)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// 1-based line or row number when known
    pub line: Option<usize>,
    pub message: String,
}

impl ParseIssue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
        }
    }

    pub fn at_line(line: usize, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Normalize an optional unit string: trimmed, absent when blank
pub fn normalize_unit(unit: Option<&str>) -> Option<String> {
    unit.map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
}
