//! Tests for HDU walking

use super::*;
use crate::app::services::fits_reader::{FitsFile, HduKind};

#[test]
fn test_walks_primary_and_extensions() {
    let bytes = create_two_table_spectrum();
    let file = FitsFile::parse("two.fits", &bytes).unwrap();

    assert_eq!(file.hdus.len(), 3);
    assert_eq!(file.hdus[0].name, "PRIMARY");
    assert_eq!(file.hdus[0].kind, HduKind::Primary);
    assert_eq!(file.hdus[0].data_len, 0);
    assert_eq!(file.hdus[1].name, "CALIB");
    assert_eq!(file.hdus[2].name, "SCI");
    assert_eq!(file.hdus[2].kind, HduKind::BinTable);
    assert_eq!(file.hdus[2].data_len, 48);
    assert!(file.warnings.is_empty());
}

#[test]
fn test_image_and_ascii_kinds() {
    let bytes = FitsBuilder::new()
        .image("IMG", &[1.0, 2.0])
        .ascii_table(None, &[("X", "I4", 1)], 4, &["   1"])
        .build();
    let file = FitsFile::parse("mixed.fits", &bytes).unwrap();

    assert_eq!(file.hdus[1].kind, HduKind::Image);
    assert_eq!(file.hdus[1].data_len, 8);
    assert!(!file.hdus[1].kind.is_table());
    assert_eq!(file.hdus[2].kind, HduKind::AsciiTable);
    assert_eq!(file.hdus[2].name, "");
}

#[test]
fn test_zero_padding_ends_cleanly() {
    let mut bytes = create_light_curve();
    bytes.extend(vec![0u8; FITS_BLOCK_SIZE]);
    let file = FitsFile::parse("padded.fits", &bytes).unwrap();
    assert_eq!(file.hdus.len(), 2);
    assert!(file.warnings.is_empty());
}

#[test]
fn test_unreadable_later_hdu_keeps_earlier_ones() {
    let mut bytes = create_two_table_spectrum();
    bytes.extend(b"XTENSION= 'BINTABLE'".iter().copied().cycle().take(300));
    let file = FitsFile::parse("junk.fits", &bytes).unwrap();

    assert_eq!(file.hdus.len(), 3);
    assert_eq!(file.warnings.len(), 1);
    assert!(file.warnings[0].contains("HDU 3"));
}

#[test]
fn test_truncated_primary_is_structural() {
    let bytes = create_light_curve();
    let err = FitsFile::parse("cut.fits", &bytes[..1000]).unwrap_err();
    assert!(err.is_structural());
    assert!(err.to_string().contains("cut.fits"));
}

#[test]
fn test_data_slice_shrinks_when_truncated() {
    let bytes = create_two_table_spectrum();
    let cut = bytes.len() - FITS_BLOCK_SIZE + 10;
    let file = FitsFile::parse("short.fits", &bytes[..cut]).unwrap();

    assert_eq!(file.hdus.len(), 3);
    assert_eq!(file.data(&file.hdus[2]).len(), 10);
}

fn oversized_header(first: String, naxis1: i64) -> Vec<u8> {
    header_block(&[
        first,
        int_card("BITPIX", 8),
        int_card("NAXIS", 2),
        int_card("NAXIS1", naxis1),
        int_card("NAXIS2", 2),
    ])
}

#[test]
fn test_primary_with_overflowing_size_is_structural() {
    let bytes = oversized_header(format!("{:<8}= {:>20}", "SIMPLE", "T"), i64::MAX);
    let err = FitsFile::parse("huge.fits", &bytes).unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn test_extension_with_overflowing_size_is_skipped() {
    let mut bytes = create_light_curve();
    bytes.extend(oversized_header(str_card("XTENSION", "IMAGE"), i64::MAX));
    let file = FitsFile::parse("huge_ext.fits", &bytes).unwrap();

    assert_eq!(file.hdus.len(), 2);
    assert_eq!(file.warnings.len(), 1);
    assert!(file.warnings[0].contains("HDU 2"));
}
