//! Binary and ASCII table decoding
//!
//! Binary tables store big-endian fields laid out by `TFORMn`; variable-length
//! (`P`/`Q`) fields hold a `(count, offset)` descriptor into the heap that
//! follows the main table. ASCII tables store fixed-width text fields starting
//! at `TBCOLn`. Integer fields honour `TNULLn`; integer and float fields
//! then apply `TSCALn`/`TZEROn`.

use byteorder::{BigEndian, ByteOrder};
use regex::Regex;
use std::sync::LazyLock;

use super::cards::{Header, HeaderValue};
use super::hdu::{Hdu, HduKind};
use crate::app::services::delimited_parser::tabulator::synthetic_name;
use crate::models::{ParseIssue, normalize_unit};

static BINARY_TFORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d*)([LXBIJKAEDCMPQ])(.*)$").expect("binary TFORM pattern is a valid regex")
});

static ASCII_TFORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([AIFED])(\d+)(?:\.(\d+))?\s*$").expect("ASCII TFORM pattern is a valid regex")
});

/// Element type of a binary table field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Logical,
    Bit,
    Byte,
    Int16,
    Int32,
    Int64,
    Char,
    Float32,
    Float64,
    Complex32,
    Complex64,
}

impl ElementType {
    fn from_code(code: char) -> Option<Self> {
        Some(match code {
            'L' => ElementType::Logical,
            'X' => ElementType::Bit,
            'B' => ElementType::Byte,
            'I' => ElementType::Int16,
            'J' => ElementType::Int32,
            'K' => ElementType::Int64,
            'A' => ElementType::Char,
            'E' => ElementType::Float32,
            'D' => ElementType::Float64,
            'C' => ElementType::Complex32,
            'M' => ElementType::Complex64,
            _ => return None,
        })
    }

    /// Bytes per element; bits are packed separately
    pub fn width(&self) -> usize {
        match self {
            ElementType::Logical | ElementType::Bit | ElementType::Byte | ElementType::Char => 1,
            ElementType::Int16 => 2,
            ElementType::Int32 | ElementType::Float32 => 4,
            ElementType::Int64 | ElementType::Float64 | ElementType::Complex32 => 8,
            ElementType::Complex64 => 16,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ElementType::Byte
                | ElementType::Int16
                | ElementType::Int32
                | ElementType::Int64
                | ElementType::Float32
                | ElementType::Float64
        )
    }
}

/// ASCII table field kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsciiKind {
    Integer,
    Float,
    Text,
}

/// Storage layout of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFormat {
    /// Fixed-size binary field of `repeat` elements
    Binary { element: ElementType, repeat: usize },

    /// Heap descriptor; `wide` is the 64-bit `Q` form
    VarLength { element: ElementType, wide: bool },

    Ascii {
        kind: AsciiKind,
        width: usize,
        decimals: Option<usize>,
    },
}

impl ColumnFormat {
    /// Parse a binary table `TFORMn` value
    pub fn parse_binary(tform: &str) -> Result<Self, ParseIssue> {
        let invalid = || ParseIssue::new(format!("unsupported TFORM '{}'", tform));
        let caps = BINARY_TFORM.captures(tform).ok_or_else(invalid)?;
        let repeat = match &caps[1] {
            "" => 1,
            digits => digits.parse::<usize>().map_err(|_| invalid())?,
        };
        let code = caps[2].chars().next().ok_or_else(invalid)?;

        if code == 'P' || code == 'Q' {
            let element = caps[3]
                .trim_start()
                .chars()
                .next()
                .and_then(ElementType::from_code)
                .ok_or_else(invalid)?;
            return Ok(ColumnFormat::VarLength {
                element,
                wide: code == 'Q',
            });
        }

        let element = ElementType::from_code(code).ok_or_else(invalid)?;
        Ok(ColumnFormat::Binary { element, repeat })
    }

    /// Parse an ASCII table `TFORMn` value
    pub fn parse_ascii(tform: &str) -> Result<Self, ParseIssue> {
        let caps = ASCII_TFORM
            .captures(tform)
            .ok_or_else(|| ParseIssue::new(format!("unsupported ASCII TFORM '{}'", tform)))?;
        let kind = match &caps[1] {
            "A" => AsciiKind::Text,
            "I" => AsciiKind::Integer,
            _ => AsciiKind::Float,
        };
        let width = caps[2]
            .parse::<usize>()
            .map_err(|_| ParseIssue::new(format!("bad field width in '{}'", tform)))?;
        let decimals = caps.get(3).and_then(|m| m.as_str().parse::<usize>().ok());
        Ok(ColumnFormat::Ascii {
            kind,
            width,
            decimals,
        })
    }

    /// Bytes the field occupies in a row
    pub fn width(&self) -> Result<usize, ParseIssue> {
        match *self {
            ColumnFormat::Binary {
                element: ElementType::Bit,
                repeat,
            } => Ok(repeat.div_ceil(8)),
            ColumnFormat::Binary { element, repeat } => repeat
                .checked_mul(element.width())
                .ok_or_else(|| ParseIssue::new(format!("field of {} elements is too wide", repeat))),
            ColumnFormat::VarLength { wide: false, .. } => Ok(8),
            ColumnFormat::VarLength { wide: true, .. } => Ok(16),
            ColumnFormat::Ascii { width, .. } => Ok(width),
        }
    }

    /// Integer and float kinds, including numeric vectors and heap arrays
    pub fn is_numeric(&self) -> bool {
        match *self {
            ColumnFormat::Binary { element, repeat } => element.is_numeric() && repeat > 0,
            ColumnFormat::VarLength { element, .. } => element.is_numeric(),
            ColumnFormat::Ascii { kind, .. } => kind != AsciiKind::Text,
        }
    }
}

/// One table column with its scaling
#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    pub name: String,
    pub unit: Option<String>,
    pub format: ColumnFormat,

    /// Byte offset of the field within a row
    pub offset: usize,

    pub scale: f64,
    pub zero: f64,
    pub null: Option<i64>,

    /// ASCII tables declare their null as a string
    pub null_text: Option<String>,
}

impl TableColumn {
    fn scaled(&self, raw: i64) -> f64 {
        if self.null == Some(raw) {
            return f64::NAN;
        }
        self.scaled_float(raw as f64)
    }

    fn scaled_float(&self, raw: f64) -> f64 {
        raw * self.scale + self.zero
    }
}

/// Decoded content of one cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellData {
    /// Numeric scalars and vectors after scaling; nulls are NaN
    Numbers(Vec<f64>),
    Text(String),
    Logical(Vec<Option<bool>>),

    /// Complex elements are not plottable; only their count is kept
    Complex(usize),
}

impl CellData {
    /// Flatten to floats, counting values that had to be coerced to NaN
    pub fn into_values(self, coerced: &mut usize) -> Vec<f64> {
        match self {
            CellData::Numbers(values) => values,
            CellData::Text(text) => {
                let trimmed = text.trim();
                match crate::models::parse_float(trimmed) {
                    Some(v) => vec![v],
                    None if trimmed.is_empty() => vec![f64::NAN],
                    None => {
                        *coerced += 1;
                        vec![f64::NAN]
                    }
                }
            }
            CellData::Logical(flags) => flags
                .into_iter()
                .map(|flag| match flag {
                    Some(true) => 1.0,
                    Some(false) => 0.0,
                    None => f64::NAN,
                })
                .collect(),
            CellData::Complex(count) => {
                *coerced += count;
                vec![f64::NAN; count]
            }
        }
    }

    /// Short text form for previews; vectors are summarized
    pub fn render(&self) -> String {
        match self {
            CellData::Numbers(values) if values.len() == 1 => values[0].to_string(),
            CellData::Numbers(values) => format!("[{} values]", values.len()),
            CellData::Text(text) => text.trim().to_string(),
            CellData::Logical(flags) if flags.len() == 1 => match flags[0] {
                Some(true) => "T".to_string(),
                Some(false) => "F".to_string(),
                None => String::new(),
            },
            CellData::Logical(flags) => format!("[{} values]", flags.len()),
            CellData::Complex(count) => format!("[{} complex values]", count),
        }
    }
}

/// Column values flattened row by row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnValues {
    pub values: Vec<f64>,

    /// String, complex or unparsable cells turned into NaN
    pub coerced: usize,

    /// Heap arrays pointing outside the data
    pub unreadable_cells: usize,
}

/// A table HDU ready for reading
#[derive(Debug, Clone)]
pub struct Table<'a> {
    pub hdu_index: usize,
    pub hdu_name: String,
    pub nrows: usize,
    pub row_len: usize,
    pub columns: Vec<TableColumn>,

    /// Complete rows present in the data
    pub rows_available: usize,

    heap_offset: usize,
    data: &'a [u8],
}

fn optional_f64(header: &Header, key: &str, default: f64) -> f64 {
    header
        .get_f64(key)
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

impl<'a> Table<'a> {
    /// Build the column layout of a table HDU over its data bytes
    pub fn from_hdu(hdu: &Hdu, data: &'a [u8]) -> Result<Self, ParseIssue> {
        let header = &hdu.header;
        let ascii = match hdu.kind {
            HduKind::BinTable => false,
            HduKind::AsciiTable => true,
            _ => return Err(ParseIssue::new(format!("HDU {} is not a table", hdu.index))),
        };
        let row_len = header.require_usize("NAXIS1")?;
        let nrows = header.require_usize("NAXIS2")?;
        let tfields = header.require_usize("TFIELDS")?;

        let mut columns = Vec::with_capacity(tfields);
        let mut next_offset = 0usize;
        for i in 0..tfields {
            let n = i + 1;
            let tform = header
                .get_str(&format!("TFORM{}", n))
                .ok_or_else(|| ParseIssue::new(format!("missing TFORM{}", n)))?;

            let (format, offset) = if ascii {
                let format = ColumnFormat::parse_ascii(tform)?;
                let tbcol = header.require_usize(&format!("TBCOL{}", n))?;
                if tbcol == 0 {
                    return Err(ParseIssue::new(format!("TBCOL{} must be 1-based", n)));
                }
                (format, tbcol - 1)
            } else {
                (ColumnFormat::parse_binary(tform)?, next_offset)
            };
            let end = offset
                .checked_add(format.width()?)
                .ok_or_else(|| ParseIssue::new(format!("column {} offset overflows", n)))?;
            next_offset = end;
            if end > row_len {
                return Err(ParseIssue::new(format!(
                    "column {} extends past the {}-byte row",
                    n, row_len
                )));
            }

            let name = header
                .get_str(&format!("TTYPE{}", n))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| synthetic_name(i));
            let (null, null_text) = match header.get(&format!("TNULL{}", n)) {
                Some(HeaderValue::Integer(v)) => (Some(*v), None),
                Some(HeaderValue::Text(s)) => (None, Some(s.trim().to_string())),
                _ => (None, None),
            };

            columns.push(TableColumn {
                name,
                unit: normalize_unit(header.get_str(&format!("TUNIT{}", n))),
                format,
                offset,
                scale: optional_f64(header, &format!("TSCAL{}", n), 1.0),
                zero: optional_f64(header, &format!("TZERO{}", n), 0.0),
                null,
                null_text,
            });
        }

        let main_len = row_len.saturating_mul(nrows);
        let heap_offset = match header.get("THEAP") {
            Some(_) => header.require_usize("THEAP")?,
            None => main_len,
        };
        let rows_available = if row_len == 0 {
            nrows
        } else {
            (data.len() / row_len).min(nrows)
        };

        Ok(Self {
            hdu_index: hdu.index,
            hdu_name: hdu.name.clone(),
            nrows,
            row_len,
            columns,
            rows_available,
            heap_offset,
            data,
        })
    }

    pub fn is_truncated(&self) -> bool {
        self.rows_available < self.nrows
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    fn row(&self, row: usize) -> &'a [u8] {
        let start = row * self.row_len;
        let data = self.data;
        data.get(start..start + self.row_len).unwrap_or(&[])
    }

    /// Decode one cell; `None` when the cell is out of range or its heap
    /// array lies outside the data
    pub fn read_cell(&self, row: usize, column: usize) -> Option<CellData> {
        if row >= self.rows_available {
            return None;
        }
        let col = self.columns.get(column)?;
        let width = col.format.width().ok()?;
        let field = self.row(row).get(col.offset..col.offset.checked_add(width)?)?;

        match col.format {
            ColumnFormat::Binary { element, repeat } => Some(decode_elements(col, element, repeat, field)),
            ColumnFormat::VarLength { element, wide } => {
                let (count, offset) = if wide {
                    (BigEndian::read_u64(&field[..8]), BigEndian::read_u64(&field[8..16]))
                } else {
                    (
                        u64::from(BigEndian::read_u32(&field[..4])),
                        u64::from(BigEndian::read_u32(&field[4..8])),
                    )
                };
                let count = usize::try_from(count).ok()?;
                let start = self
                    .heap_offset
                    .checked_add(usize::try_from(offset).ok()?)?;
                let len = match element {
                    ElementType::Bit => count.div_ceil(8),
                    _ => count.checked_mul(element.width())?,
                };
                let heap = self.data.get(start..start.checked_add(len)?)?;
                Some(decode_elements(col, element, count, heap))
            }
            ColumnFormat::Ascii {
                kind, decimals, ..
            } => Some(decode_ascii(col, kind, decimals, field)),
        }
    }

    /// Every value of a column, flattened row by row
    pub fn read_column(&self, column: usize) -> ColumnValues {
        let mut out = ColumnValues::default();
        for row in 0..self.rows_available {
            match self.read_cell(row, column) {
                Some(cell) => {
                    let values = cell.into_values(&mut out.coerced);
                    out.values.extend(values);
                }
                None => out.unreadable_cells += 1,
            }
        }
        out
    }
}

fn decode_elements(col: &TableColumn, element: ElementType, count: usize, bytes: &[u8]) -> CellData {
    let width = element.width();
    let chunks = || bytes.chunks_exact(width).take(count);
    match element {
        ElementType::Char => {
            let text: String = bytes
                .iter()
                .take(count)
                .take_while(|&&b| b != 0)
                .map(|&b| if b.is_ascii() { b as char } else { '?' })
                .collect();
            CellData::Text(text)
        }
        ElementType::Logical => CellData::Logical(
            chunks()
                .map(|b| match b[0] {
                    b'T' => Some(true),
                    b'F' => Some(false),
                    _ => None,
                })
                .collect(),
        ),
        ElementType::Bit => CellData::Numbers(
            (0..count)
                .map(|i| {
                    let byte = bytes.get(i / 8).copied().unwrap_or(0);
                    f64::from((byte >> (7 - i % 8)) & 1)
                })
                .collect(),
        ),
        ElementType::Complex32 | ElementType::Complex64 => CellData::Complex(chunks().count()),
        ElementType::Float32 => CellData::Numbers(
            chunks()
                .map(|b| col.scaled_float(f64::from(BigEndian::read_f32(b))))
                .collect(),
        ),
        ElementType::Float64 => CellData::Numbers(
            chunks()
                .map(|b| col.scaled_float(BigEndian::read_f64(b)))
                .collect(),
        ),
        ElementType::Byte | ElementType::Int16 | ElementType::Int32 | ElementType::Int64 => {
            CellData::Numbers(
                chunks()
                    .map(|b| {
                        let raw = match element {
                            ElementType::Byte => i64::from(b[0]),
                            ElementType::Int16 => i64::from(BigEndian::read_i16(b)),
                            ElementType::Int32 => i64::from(BigEndian::read_i32(b)),
                            _ => BigEndian::read_i64(b),
                        };
                        col.scaled(raw)
                    })
                    .collect(),
            )
        }
    }
}

/// Parse a Fortran-style float field, applying implied decimals when the
/// field has no decimal point
fn parse_ascii_float(field: &str, decimals: Option<usize>) -> Option<f64> {
    let normalized = field.replace(['D', 'd'], "E");
    let value = normalized.parse::<f64>().ok()?;
    match decimals {
        Some(d) if d > 0 && !field.contains('.') && !normalized.contains(['E', 'e']) => {
            Some(value / 10f64.powi(d as i32))
        }
        _ => Some(value),
    }
}

fn decode_ascii(col: &TableColumn, kind: AsciiKind, decimals: Option<usize>, field: &[u8]) -> CellData {
    let text: String = field
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect();
    let trimmed = text.trim();

    if kind == AsciiKind::Text {
        return CellData::Text(text);
    }
    if trimmed.is_empty() || col.null_text.as_deref() == Some(trimmed) {
        return CellData::Numbers(vec![f64::NAN]);
    }
    match kind {
        AsciiKind::Integer => match trimmed.parse::<i64>() {
            Ok(raw) => CellData::Numbers(vec![col.scaled_float(raw as f64)]),
            Err(_) => CellData::Text(text),
        },
        _ => match parse_ascii_float(trimmed, decimals) {
            Some(v) => CellData::Numbers(vec![col.scaled_float(v)]),
            None => CellData::Text(text),
        },
    }
}
