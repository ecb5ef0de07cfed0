//! Test utilities for the FITS reader
//!
//! FITS fixtures are assembled in memory: header cards padded to 80 bytes,
//! headers and data padded to 2880-byte blocks, table fields big-endian.

use byteorder::{BigEndian, WriteBytesExt};

use crate::app::services::fits_reader::ColumnFormat;
use crate::constants::FITS_BLOCK_SIZE;

// Test modules
mod hdu_tests;
mod table_tests;

pub fn int_card(key: &str, value: i64) -> String {
    format!("{:<8}= {:>20}", key, value)
}

pub fn real_card(key: &str, value: f64) -> String {
    format!("{:<8}= {:>20}", key, value)
}

pub fn str_card(key: &str, value: &str) -> String {
    format!("{:<8}= '{:<8}'", key, value)
}

/// Header block: cards, `END`, blank padding
pub fn header_block(cards: &[String]) -> Vec<u8> {
    let mut out = Vec::new();
    for card in cards.iter().map(String::as_str).chain(["END"]) {
        out.extend(format!("{:<80}", card).into_bytes());
    }
    let padded = out.len().div_ceil(FITS_BLOCK_SIZE) * FITS_BLOCK_SIZE;
    out.resize(padded, b' ');
    out
}

/// Column declaration for [`FitsBuilder::bintable`]
#[derive(Debug, Clone)]
pub struct Col {
    pub name: &'static str,
    pub tform: &'static str,
    pub unit: Option<&'static str>,
}

pub fn col(name: &'static str, tform: &'static str) -> Col {
    Col {
        name,
        tform,
        unit: None,
    }
}

pub fn col_with_unit(name: &'static str, tform: &'static str, unit: &'static str) -> Col {
    Col {
        name,
        tform,
        unit: Some(unit),
    }
}

/// In-memory FITS file under construction
#[derive(Debug, Clone)]
pub struct FitsBuilder {
    bytes: Vec<u8>,
}

impl FitsBuilder {
    /// Primary HDU without data
    pub fn new() -> Self {
        let cards = vec![
            format!("{:<8}= {:>20}", "SIMPLE", "T"),
            int_card("BITPIX", 8),
            int_card("NAXIS", 0),
            format!("{:<8}= {:>20}", "EXTEND", "T"),
        ];
        Self {
            bytes: header_block(&cards),
        }
    }

    fn push_data(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
        let padded = self.bytes.len().div_ceil(FITS_BLOCK_SIZE) * FITS_BLOCK_SIZE;
        self.bytes.resize(padded, 0);
    }

    /// Binary table; `rows` holds the packed main table followed by any heap
    pub fn bintable(
        self,
        name: Option<&str>,
        columns: &[Col],
        nrows: usize,
        rows: Vec<u8>,
    ) -> Self {
        self.bintable_with_cards(name, columns, nrows, rows, &[])
    }

    pub fn bintable_with_cards(
        mut self,
        name: Option<&str>,
        columns: &[Col],
        nrows: usize,
        rows: Vec<u8>,
        extra: &[String],
    ) -> Self {
        let row_len: usize = columns
            .iter()
            .map(|c| ColumnFormat::parse_binary(c.tform).unwrap().width().unwrap())
            .sum();
        let heap = rows.len() - row_len * nrows;

        let mut cards = vec![
            str_card("XTENSION", "BINTABLE"),
            int_card("BITPIX", 8),
            int_card("NAXIS", 2),
            int_card("NAXIS1", row_len as i64),
            int_card("NAXIS2", nrows as i64),
            int_card("PCOUNT", heap as i64),
            int_card("GCOUNT", 1),
            int_card("TFIELDS", columns.len() as i64),
        ];
        if let Some(name) = name {
            cards.push(str_card("EXTNAME", name));
        }
        for (i, c) in columns.iter().enumerate() {
            let n = i + 1;
            cards.push(str_card(&format!("TTYPE{}", n), c.name));
            cards.push(str_card(&format!("TFORM{}", n), c.tform));
            if let Some(unit) = c.unit {
                cards.push(str_card(&format!("TUNIT{}", n), unit));
            }
        }
        cards.extend(extra.iter().cloned());

        self.bytes.extend(header_block(&cards));
        self.push_data(&rows);
        self
    }

    /// ASCII table; `fields` are `(name, tform, tbcol)` and rows are the
    /// fixed-width text lines
    pub fn ascii_table(
        mut self,
        name: Option<&str>,
        fields: &[(&str, &str, usize)],
        row_len: usize,
        lines: &[&str],
    ) -> Self {
        let mut cards = vec![
            str_card("XTENSION", "TABLE"),
            int_card("BITPIX", 8),
            int_card("NAXIS", 2),
            int_card("NAXIS1", row_len as i64),
            int_card("NAXIS2", lines.len() as i64),
            int_card("PCOUNT", 0),
            int_card("GCOUNT", 1),
            int_card("TFIELDS", fields.len() as i64),
        ];
        if let Some(name) = name {
            cards.push(str_card("EXTNAME", name));
        }
        for (i, (field, tform, tbcol)) in fields.iter().enumerate() {
            let n = i + 1;
            cards.push(str_card(&format!("TTYPE{}", n), field));
            cards.push(str_card(&format!("TFORM{}", n), tform));
            cards.push(int_card(&format!("TBCOL{}", n), *tbcol as i64));
        }

        let mut data = Vec::new();
        for line in lines {
            data.extend(format!("{:<width$}", line, width = row_len).into_bytes());
        }
        self.bytes.extend(header_block(&cards));
        self.push_data(&data);
        self
    }

    /// Image extension, which is never a table candidate
    pub fn image(mut self, name: &str, pixels: &[f32]) -> Self {
        let cards = vec![
            str_card("XTENSION", "IMAGE"),
            int_card("BITPIX", -32),
            int_card("NAXIS", 1),
            int_card("NAXIS1", pixels.len() as i64),
            int_card("PCOUNT", 0),
            int_card("GCOUNT", 1),
            str_card("EXTNAME", name),
        ];
        let mut data = Vec::new();
        for p in pixels {
            data.write_f32::<BigEndian>(*p).unwrap();
        }
        self.bytes.extend(header_block(&cards));
        self.push_data(&data);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// Packed rows of `D` (float64) scalars
pub fn f64_rows(rows: &[&[f64]]) -> Vec<u8> {
    let mut out = Vec::new();
    for row in rows {
        for v in *row {
            out.write_f64::<BigEndian>(*v).unwrap();
        }
    }
    out
}

/// TESS-style light curve: TIME, TIMECORR, SAP_FLUX, PDCSAP_FLUX, QUALITY
pub fn create_light_curve() -> Vec<u8> {
    let columns = [
        col_with_unit("TIME", "D", "BJD - 2457000, days"),
        col("TIMECORR", "E"),
        col_with_unit("SAP_FLUX", "E", "e-/s"),
        col_with_unit("PDCSAP_FLUX", "E", "e-/s"),
        col("QUALITY", "J"),
    ];
    let samples: [(f64, f32, f32, f32, i32); 4] = [
        (1325.30, 0.001, 100.0, 101.0, 0),
        (1325.32, 0.001, f32::NAN, 102.0, 128),
        (1325.34, 0.001, 100.5, f32::INFINITY, 0),
        (1325.36, 0.001, 100.7, 103.0, 0),
    ];
    let mut rows = Vec::new();
    for (time, corr, sap, pdc, quality) in samples {
        rows.write_f64::<BigEndian>(time).unwrap();
        rows.write_f32::<BigEndian>(corr).unwrap();
        rows.write_f32::<BigEndian>(sap).unwrap();
        rows.write_f32::<BigEndian>(pdc).unwrap();
        rows.write_i32::<BigEndian>(quality).unwrap();
    }
    FitsBuilder::new()
        .bintable(Some("LIGHTCURVE"), &columns, samples.len(), rows)
        .build()
}

/// Two tables where the second is the science spectrum
pub fn create_two_table_spectrum() -> Vec<u8> {
    FitsBuilder::new()
        .bintable(
            Some("CALIB"),
            &[col("A", "D"), col("B", "D")],
            2,
            f64_rows(&[&[1.0, 2.0], &[3.0, 4.0]]),
        )
        .bintable(
            Some("SCI"),
            &[
                col_with_unit("FLUX", "D", "erg/s/cm2/A"),
                col_with_unit("WAVELENGTH", "D", "Angstrom"),
            ],
            3,
            f64_rows(&[&[5.0, 4000.0], &[6.0, 4001.0], &[7.0, 4002.0]]),
        )
        .build()
}
