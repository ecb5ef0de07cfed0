//! Format detection for uploaded payloads
//!
//! Classification runs in a fixed order: gzip-wrapped FITS is inflated first,
//! then FITS is recognized by magic bytes or file extension, then JCAMP-DX by
//! its `##` records and content markers. Everything else is delimited text.

use flate2::read::MultiGzDecoder;
use std::borrow::Cow;
use std::io::Read;
use tracing::debug;

use crate::constants::{
    FITS_EXTENSIONS, FITS_EXTENSION_MAGIC, FITS_PRIMARY_MAGIC, GZIP_MAGIC, JCAMP_CONTENT_MARKERS,
    JCAMP_RECORD_PREFIX,
};
use crate::models::ParserKind;
use crate::{Error, Result};

/// Outcome of sniffing: the chosen parser and the payload it should read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SniffedPayload<'a> {
    pub parser: ParserKind,

    /// The original bytes, or the inflated bytes for gzip-wrapped FITS
    pub payload: Cow<'a, [u8]>,

    pub decompressed: bool,
}

/// Whether the lowercased file name carries a FITS-family extension
pub fn looks_like_fits_filename(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    FITS_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Whether the payload should be inflated before FITS detection
pub fn is_gzip_fits(file_name: &str, raw: &[u8]) -> bool {
    let lower = file_name.to_ascii_lowercase();
    lower.ends_with(".gz") && looks_like_fits_filename(&lower) && raw.starts_with(&GZIP_MAGIC)
}

/// Whether the head of a payload starts with a FITS header card
pub fn has_fits_magic(head: &[u8]) -> bool {
    head.starts_with(FITS_PRIMARY_MAGIC) || head.starts_with(FITS_EXTENSION_MAGIC)
}

/// Whether the head of a payload carries JCAMP-DX records
pub fn has_jcamp_markers(head: &[u8]) -> bool {
    if !contains(head, JCAMP_RECORD_PREFIX) {
        return false;
    }
    let upper = head.to_ascii_uppercase();
    JCAMP_CONTENT_MARKERS
        .iter()
        .any(|marker| contains(&upper, marker))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Inflate a gzip stream (all members)
pub fn gunzip(file_name: &str, raw: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = MultiGzDecoder::new(raw);
    let mut inflated = Vec::new();
    decoder
        .read_to_end(&mut inflated)
        .map_err(|e| Error::decompression(file_name, "gzip inflate failed", e))?;
    Ok(inflated)
}

/// Classify a payload, inflating gzip-wrapped FITS on the way.
///
/// `head_bytes` bounds how much of the payload is inspected for magic numbers
/// and content markers. The only failure is a gzip stream that cannot be
/// inflated.
pub fn sniff_format<'a>(
    file_name: &str,
    raw: &'a [u8],
    head_bytes: usize,
) -> Result<SniffedPayload<'a>> {
    let (payload, decompressed) = if is_gzip_fits(file_name, raw) {
        let inflated = gunzip(file_name, raw)?;
        debug!(
            "Inflated {} from {} to {} bytes",
            file_name,
            raw.len(),
            inflated.len()
        );
        (Cow::Owned(inflated), true)
    } else {
        (Cow::Borrowed(raw), false)
    };

    let fits_head = &payload[..payload.len().min(head_bytes)];
    if has_fits_magic(fits_head) || looks_like_fits_filename(file_name) {
        debug!("Detected FITS payload: {}", file_name);
        return Ok(SniffedPayload {
            parser: ParserKind::Fits,
            payload,
            decompressed,
        });
    }

    let head = &raw[..raw.len().min(head_bytes)];
    let parser = if has_jcamp_markers(head) {
        ParserKind::JcampDx
    } else {
        ParserKind::DelimitedText
    };
    debug!("Detected {} payload: {}", parser, file_name);

    Ok(SniffedPayload {
        parser,
        payload,
        decompressed,
    })
}
