//! FITS header cards and header blocks
//!
//! A header is a run of 80-byte ASCII cards in 2880-byte blocks, closed by an
//! `END` card. Value cards carry `= ` in columns 9-10; the value is a quoted
//! string (with `''` as an escaped quote), a logical `T`/`F`, or a number.
//! Anything after an unquoted `/` is a comment.

use crate::constants::{FITS_BLOCK_SIZE, FITS_CARD_SIZE};
use crate::models::ParseIssue;

/// A typed header value
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Logical(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    /// Value field present but not understood
    Unparsed(String),
}

impl HeaderValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HeaderValue::Integer(v) => Some(*v),
            HeaderValue::Real(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HeaderValue::Integer(v) => Some(*v as f64),
            HeaderValue::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HeaderValue::Logical(b) => Some(*b),
            _ => None,
        }
    }
}

/// One keyword/value card
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub keyword: String,
    pub value: Option<HeaderValue>,
}

/// Parsed header of one HDU
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    cards: Vec<Card>,
}

impl Header {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// First value for a keyword
    pub fn get(&self, keyword: &str) -> Option<&HeaderValue> {
        self.cards
            .iter()
            .find(|card| card.keyword == keyword)
            .and_then(|card| card.value.as_ref())
    }

    pub fn get_i64(&self, keyword: &str) -> Option<i64> {
        self.get(keyword).and_then(HeaderValue::as_i64)
    }

    pub fn get_f64(&self, keyword: &str) -> Option<f64> {
        self.get(keyword).and_then(HeaderValue::as_f64)
    }

    /// String value with trailing blanks removed
    pub fn get_str(&self, keyword: &str) -> Option<&str> {
        self.get(keyword).and_then(HeaderValue::as_str)
    }

    pub fn get_bool(&self, keyword: &str) -> Option<bool> {
        self.get(keyword).and_then(HeaderValue::as_bool)
    }

    /// Non-negative integer value; missing or negative values are issues
    pub fn require_usize(&self, keyword: &str) -> Result<usize, ParseIssue> {
        let value = self
            .get_i64(keyword)
            .ok_or_else(|| ParseIssue::new(format!("missing or non-integer {}", keyword)))?;
        usize::try_from(value)
            .map_err(|_| ParseIssue::new(format!("negative {} ({})", keyword, value)))
    }
}

/// Parse a numeric value field, accepting Fortran `D` exponents
fn parse_number(field: &str) -> Option<HeaderValue> {
    if let Ok(v) = field.parse::<i64>() {
        return Some(HeaderValue::Integer(v));
    }
    let normalized = field.replace(['D', 'd'], "E");
    normalized.parse::<f64>().ok().map(HeaderValue::Real)
}

/// Parse the value field of a card (columns 11-80)
fn parse_value(field: &str) -> Option<HeaderValue> {
    let trimmed = field.trim_start();
    if let Some(rest) = trimmed.strip_prefix('\'') {
        let mut text = String::new();
        let mut chars = rest.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    text.push('\'');
                    chars.next();
                    continue;
                }
                return Some(HeaderValue::Text(text.trim_end().to_string()));
            }
            text.push(c);
        }
        // Unterminated string: keep what is there
        return Some(HeaderValue::Text(text.trim_end().to_string()));
    }

    let value = trimmed.split('/').next().unwrap_or("").trim();
    match value {
        "" => None,
        "T" => Some(HeaderValue::Logical(true)),
        "F" => Some(HeaderValue::Logical(false)),
        other => Some(parse_number(other).unwrap_or_else(|| HeaderValue::Unparsed(other.to_string()))),
    }
}

/// Parse one 80-byte card
pub fn parse_card(raw: &[u8]) -> Card {
    let text: String = raw
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect();
    let keyword = text.get(..8).unwrap_or(text.as_str()).trim_end().to_string();
    let value = match text.get(8..10) {
        Some("= ") => text.get(10..).and_then(parse_value),
        _ => None,
    };
    Card { keyword, value }
}

/// Read the header starting at `offset`.
///
/// Returns the header and the offset of the first data byte (the end of the
/// last header block). Fails when the bytes run out before an `END` card.
pub fn read_header(bytes: &[u8], offset: usize) -> Result<(Header, usize), ParseIssue> {
    let mut cards = Vec::new();
    let mut block_start = offset;

    loop {
        let block = bytes
            .get(block_start..block_start + FITS_BLOCK_SIZE)
            .ok_or_else(|| {
                ParseIssue::new(format!(
                    "header at byte {} ends before an END card",
                    offset
                ))
            })?;
        for raw in block.chunks_exact(FITS_CARD_SIZE) {
            let card = parse_card(raw);
            if card.keyword == "END" {
                return Ok((Header::new(cards), block_start + FITS_BLOCK_SIZE));
            }
            if !card.keyword.is_empty() {
                cards.push(card);
            }
        }
        block_start += FITS_BLOCK_SIZE;
    }
}
