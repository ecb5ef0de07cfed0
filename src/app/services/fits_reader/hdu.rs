//! HDU walking over an in-memory FITS file

use tracing::{debug, warn};

use super::cards::{Header, read_header};
use crate::constants::{FITS_BLOCK_SIZE, FITS_CARD_SIZE, FITS_PRIMARY_HDU_NAME};
use crate::models::ParseIssue;
use crate::{Error, Result};

/// What an HDU holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HduKind {
    Primary,
    Image,
    BinTable,
    AsciiTable,
    Other,
}

impl HduKind {
    fn from_header(index: usize, header: &Header) -> Self {
        if index == 0 {
            return HduKind::Primary;
        }
        match header.get_str("XTENSION").map(str::trim) {
            Some("BINTABLE") | Some("A3DTABLE") => HduKind::BinTable,
            Some("TABLE") => HduKind::AsciiTable,
            Some("IMAGE") => HduKind::Image,
            _ => HduKind::Other,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, HduKind::BinTable | HduKind::AsciiTable)
    }
}

/// One header-data unit
#[derive(Debug, Clone, PartialEq)]
pub struct Hdu {
    pub index: usize,
    pub name: String,
    pub kind: HduKind,
    pub header: Header,

    /// Offset of the first data byte in the file
    pub data_offset: usize,

    /// Data size declared by the header, without block padding
    pub data_len: usize,
}

/// Round a byte count up to whole FITS blocks; `None` on overflow
pub fn padded(len: usize) -> Option<usize> {
    len.div_ceil(FITS_BLOCK_SIZE).checked_mul(FITS_BLOCK_SIZE)
}

/// Declared data size: `|BITPIX|/8 * GCOUNT * (PCOUNT + NAXIS1 * ... * NAXISn)`
pub fn data_size(header: &Header) -> std::result::Result<usize, ParseIssue> {
    let bitpix = header
        .get_i64("BITPIX")
        .ok_or_else(|| ParseIssue::new("missing BITPIX"))?;
    if !matches!(bitpix, 8 | 16 | 32 | 64 | -32 | -64) {
        return Err(ParseIssue::new(format!("invalid BITPIX ({})", bitpix)));
    }
    let naxis = header.require_usize("NAXIS")?;
    if naxis == 0 {
        return Ok(0);
    }

    let overflow = || ParseIssue::new("data size overflows");
    let mut elements: usize = 1;
    for axis in 1..=naxis {
        let n = header.require_usize(&format!("NAXIS{}", axis))?;
        elements = elements.checked_mul(n).ok_or_else(overflow)?;
    }
    let pcount = match header.get("PCOUNT") {
        Some(_) => header.require_usize("PCOUNT")?,
        None => 0,
    };
    let gcount = match header.get("GCOUNT") {
        Some(_) => header.require_usize("GCOUNT")?,
        None => 1,
    };

    (bitpix.unsigned_abs() as usize / 8)
        .checked_mul(gcount)
        .and_then(|v| v.checked_mul(elements.checked_add(pcount)?))
        .ok_or_else(overflow)
}

/// Parsed HDU layout of a FITS file
#[derive(Debug, Clone)]
pub struct FitsFile<'a> {
    bytes: &'a [u8],
    pub hdus: Vec<Hdu>,
    pub warnings: Vec<String>,
}

impl<'a> FitsFile<'a> {
    /// Walk every HDU.
    ///
    /// An unreadable primary header is a structural failure. A later HDU that
    /// cannot be read ends the walk with a warning; earlier HDUs are kept.
    pub fn parse(file_name: &str, bytes: &'a [u8]) -> Result<Self> {
        let primary = read_hdu(bytes, 0, 0, "SIMPLE")
            .map_err(|issue| Error::fits_structure(file_name, issue.to_string()))?;
        let mut offset = next_offset(&primary);
        let mut hdus = vec![primary];
        let mut warnings = Vec::new();

        loop {
            let rest = bytes.get(offset..).unwrap_or(&[]);
            if rest.len() < FITS_CARD_SIZE || rest.iter().all(|&b| b == 0 || b == b' ') {
                break;
            }
            let index = hdus.len();
            match read_hdu(bytes, offset, index, "XTENSION") {
                Ok(hdu) => {
                    offset = next_offset(&hdu);
                    hdus.push(hdu);
                }
                Err(issue) => {
                    warn!("Stopped reading {} at HDU {}: {}", file_name, index, issue);
                    warnings.push(format!(
                        "Could not read FITS HDU {} ({}); later HDUs ignored.",
                        index, issue
                    ));
                    break;
                }
            }
        }

        debug!("Read {} HDUs from {}", hdus.len(), file_name);
        Ok(Self {
            bytes,
            hdus,
            warnings,
        })
    }

    /// Data bytes actually present for an HDU; shorter than declared when the
    /// file is truncated
    pub fn data(&self, hdu: &Hdu) -> &'a [u8] {
        let bytes = self.bytes;
        let start = hdu.data_offset.min(bytes.len());
        let end = hdu.data_offset.saturating_add(hdu.data_len).min(bytes.len());
        &bytes[start..end]
    }

    pub fn get(&self, index: usize) -> Option<&Hdu> {
        self.hdus.get(index)
    }
}

/// Start of the following HDU; `read_hdu` has already checked the sum
fn next_offset(hdu: &Hdu) -> usize {
    padded(hdu.data_len)
        .and_then(|len| hdu.data_offset.checked_add(len))
        .unwrap_or(usize::MAX)
}

fn read_hdu(
    bytes: &[u8],
    offset: usize,
    index: usize,
    first_keyword: &str,
) -> std::result::Result<Hdu, ParseIssue> {
    let (header, data_offset) = read_header(bytes, offset)?;
    let first = header.cards().first().map(|card| card.keyword.as_str());
    if first != Some(first_keyword) {
        return Err(ParseIssue::new(format!(
            "header at byte {} does not start with {}",
            offset, first_keyword
        )));
    }
    let data_len = data_size(&header)?;
    padded(data_len)
        .and_then(|len| data_offset.checked_add(len))
        .ok_or_else(|| ParseIssue::new("data size overflows"))?;
    let kind = HduKind::from_header(index, &header);
    let name = match header.get_str("EXTNAME") {
        Some(name) => name.trim().to_string(),
        None if index == 0 => FITS_PRIMARY_HDU_NAME.to_string(),
        None => String::new(),
    };

    Ok(Hdu {
        index,
        name,
        kind,
        header,
        data_offset,
        data_len,
    })
}
