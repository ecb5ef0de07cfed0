//! Tests for table layout and cell decoding

use byteorder::{BigEndian, WriteBytesExt};

use super::*;
use crate::app::services::fits_reader::table::{CellData, Table};
use crate::app::services::fits_reader::FitsFile;

fn first_table(bytes: &[u8]) -> Table<'_> {
    let file = FitsFile::parse("table.fits", bytes).unwrap();
    let hdu = file.hdus.iter().find(|h| h.kind.is_table()).unwrap();
    Table::from_hdu(hdu, file.data(hdu)).unwrap()
}

#[test]
fn test_scaled_integer_column_with_nulls() {
    let mut rows = Vec::new();
    for raw in [0i32, 10, -1] {
        rows.write_i32::<BigEndian>(raw).unwrap();
    }
    let bytes = FitsBuilder::new()
        .bintable_with_cards(
            None,
            &[col("COUNTS", "J")],
            3,
            rows,
            &[
                int_card("TNULL1", -1),
                real_card("TSCAL1", 0.5),
                real_card("TZERO1", 100.0),
            ],
        )
        .build();
    let table = first_table(&bytes);
    let column = table.read_column(0);

    assert_eq!(column.values[0], 100.0);
    assert_eq!(column.values[1], 105.0);
    assert!(column.values[2].is_nan());
    assert_eq!(column.coerced, 0);
}

#[test]
fn test_scaled_float_columns() {
    let mut rows = Vec::new();
    for (wave, flux) in [(1.5f64, 2.0f32), (2.5, f32::NAN)] {
        rows.write_f64::<BigEndian>(wave).unwrap();
        rows.write_f32::<BigEndian>(flux).unwrap();
    }
    let bytes = FitsBuilder::new()
        .bintable_with_cards(
            None,
            &[col("WAVE", "D"), col("FLUX", "E")],
            2,
            rows,
            &[
                real_card("TZERO1", 1000.0),
                real_card("TSCAL2", 0.5),
                real_card("TZERO2", 10.0),
            ],
        )
        .build();
    let table = first_table(&bytes);

    assert_eq!(table.read_column(0).values, vec![1001.5, 1002.5]);
    let flux = table.read_column(1).values;
    assert_eq!(flux[0], 11.0);
    assert!(flux[1].is_nan());
}

#[test]
fn test_vector_cells_flatten_row_by_row() {
    let bytes = FitsBuilder::new()
        .bintable(
            None,
            &[col("FLUX", "3D")],
            2,
            f64_rows(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]),
        )
        .build();
    let table = first_table(&bytes);

    assert_eq!(table.read_column(0).values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(table.read_cell(0, 0).unwrap().render(), "[3 values]");
}

#[test]
fn test_string_and_logical_cells() {
    let mut rows = Vec::new();
    rows.extend(b"1.5 T");
    rows.extend(b"n/a F");
    let bytes = FitsBuilder::new()
        .bintable(None, &[col("NOTE", "4A"), col("OK", "L")], 2, rows)
        .build();
    let table = first_table(&bytes);

    let notes = table.read_column(0);
    assert_eq!(notes.values[0], 1.5);
    assert!(notes.values[1].is_nan());
    assert_eq!(notes.coerced, 1);

    assert_eq!(table.read_column(1).values, vec![1.0, 0.0]);
    assert_eq!(
        table.read_cell(0, 1),
        Some(CellData::Logical(vec![Some(true)]))
    );
    assert!(!table.columns[0].format.is_numeric());
}

#[test]
fn test_variable_length_heap_arrays() {
    let mut rows = Vec::new();
    for (count, offset) in [(2u32, 0u32), (1, 8), (5, 100)] {
        rows.write_u32::<BigEndian>(count).unwrap();
        rows.write_u32::<BigEndian>(offset).unwrap();
    }
    for v in [1.0f32, 2.0, 3.0] {
        rows.write_f32::<BigEndian>(v).unwrap();
    }
    let bytes = FitsBuilder::new()
        .bintable(None, &[col("SPEC", "PE(2)")], 3, rows)
        .build();
    let table = first_table(&bytes);
    let column = table.read_column(0);

    assert!(table.columns[0].format.is_numeric());
    assert_eq!(column.values, vec![1.0, 2.0, 3.0]);
    assert_eq!(column.unreadable_cells, 1);
}

#[test]
fn test_ascii_table_fields() {
    let lines: Vec<String> = [
        ("500.00", "1.2500E+00", "ok"),
        ("501.00", "1.2600D+00", "ok"),
        ("", "1.2700E+00", "bad"),
    ]
    .iter()
    .map(|(w, f, n)| format!("{:>8} {:>12} {:<4}", w, f, n))
    .collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let bytes = FitsBuilder::new()
        .ascii_table(
            Some("TAB"),
            &[("WAVE", "F8.2", 1), ("FLUX", "E12.4", 10), ("NOTE", "A4", 23)],
            26,
            &refs,
        )
        .build();
    let table = first_table(&bytes);

    let wave = table.read_column(0).values;
    assert_eq!(&wave[..2], &[500.0, 501.0]);
    assert!(wave[2].is_nan());
    assert_eq!(table.read_column(0).coerced, 0);

    let flux = table.read_column(1).values;
    assert!((flux[1] - 1.26).abs() < 1e-12);
    assert!(!table.columns[2].format.is_numeric());
    assert_eq!(table.read_cell(2, 2).unwrap().render(), "bad");
}

#[test]
fn test_truncated_data_reads_complete_rows() {
    let bytes = create_light_curve();
    let data_start = 2 * FITS_BLOCK_SIZE;
    let table = first_table(&bytes[..data_start + 2 * 24 + 5]);

    assert_eq!(table.nrows, 4);
    assert_eq!(table.rows_available, 2);
    assert!(table.is_truncated());
    assert_eq!(table.read_column(0).values.len(), 2);
}

#[test]
fn test_blank_column_name_is_synthesized() {
    let bytes = FitsBuilder::new()
        .bintable(None, &[col("WAVE", "D"), col("", "D")], 1, f64_rows(&[&[1.0, 2.0]]))
        .build();
    let table = first_table(&bytes);
    assert_eq!(table.column_names(), vec!["WAVE", "col_2"]);
}
