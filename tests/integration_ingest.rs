//! End-to-end ingestion tests over files on disk
//!
//! Each test writes a realistic upload into a temporary directory, loads it
//! through `RawPayload::from_path` with the configured byte bound, and runs
//! it through the public engine API.

use byteorder::{BigEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::GzEncoder;
use spectra_ingest::constants::messages;
use spectra_ingest::models::Delimiter;
use spectra_ingest::{
    CanonicalAction, ColumnSelection, Error, IngestConfig, IngestEngine, ParserKind,
    PreviewOptions, RawPayload,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn load(path: &Path) -> RawPayload {
    RawPayload::from_path(path, IngestConfig::default().max_commit_bytes).unwrap()
}

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// FITS header block: 80-byte cards, `END`, padded to 2880 bytes
fn header_block(cards: &[String]) -> Vec<u8> {
    let mut out = Vec::new();
    for card in cards.iter().map(String::as_str).chain(["END"]) {
        out.extend(format!("{:<80}", card).into_bytes());
    }
    out.resize(out.len().div_ceil(2880) * 2880, b' ');
    out
}

/// Single binary table `SPECTRUM` with WAVELENGTH and FLUX double columns
fn spectrum_fits(points: &[(f64, f64)]) -> Vec<u8> {
    let mut bytes = header_block(&[
        format!("{:<8}= {:>20}", "SIMPLE", "T"),
        format!("{:<8}= {:>20}", "BITPIX", 8),
        format!("{:<8}= {:>20}", "NAXIS", 0),
    ]);
    bytes.extend(header_block(&[
        format!("{:<8}= '{:<8}'", "XTENSION", "BINTABLE"),
        format!("{:<8}= {:>20}", "BITPIX", 8),
        format!("{:<8}= {:>20}", "NAXIS", 2),
        format!("{:<8}= {:>20}", "NAXIS1", 16),
        format!("{:<8}= {:>20}", "NAXIS2", points.len()),
        format!("{:<8}= {:>20}", "PCOUNT", 0),
        format!("{:<8}= {:>20}", "GCOUNT", 1),
        format!("{:<8}= {:>20}", "TFIELDS", 2),
        format!("{:<8}= '{:<8}'", "EXTNAME", "SPECTRUM"),
        format!("{:<8}= '{:<8}'", "TTYPE1", "WAVELENGTH"),
        format!("{:<8}= '{:<8}'", "TFORM1", "D"),
        format!("{:<8}= '{:<8}'", "TUNIT1", "Angstrom"),
        format!("{:<8}= '{:<8}'", "TTYPE2", "FLUX"),
        format!("{:<8}= '{:<8}'", "TFORM2", "D"),
        format!("{:<8}= '{:<8}'", "TUNIT2", "erg/s/cm2/A"),
    ]));

    let mut data = Vec::new();
    for (wave, flux) in points {
        data.write_f64::<BigEndian>(*wave).unwrap();
        data.write_f64::<BigEndian>(*flux).unwrap();
    }
    data.resize(data.len().div_ceil(2880) * 2880, 0);
    bytes.extend(data);
    bytes
}

fn decreasing_points() -> Vec<(f64, f64)> {
    vec![(6000.0, 3.0), (5000.0, 2.0), (4000.0, 1.0)]
}

#[test]
fn test_csv_upload_commits_ascending_series() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "scan.csv",
        b"wavelength (nm),intensity [counts]\n702,3\n701,2\n700,1\n",
    );
    let engine = IngestEngine::new();
    let raw = load(&path);

    let preview = engine.preview(&raw, &PreviewOptions::default()).unwrap();
    assert_eq!(preview.parser, ParserKind::DelimitedText);
    assert_eq!(preview.suggested_x_index, Some(0));
    assert_eq!(preview.suggested_y_index, Some(1));

    let selection = ColumnSelection::new().with_columns(0, 1);
    let series = engine.commit(&raw, &selection).unwrap();
    assert_eq!(series.source_file_name, "scan.csv");
    assert_eq!(series.x, vec![700.0, 701.0, 702.0]);
    assert_eq!(series.y, vec![1.0, 2.0, 3.0]);
    assert_eq!(series.x_unit.as_deref(), Some("nm"));
    assert_eq!(series.y_unit.as_deref(), Some("counts"));
    assert_eq!(series.parser_decisions.canonicalization, CanonicalAction::Reversed);
    assert_eq!(series.warnings, vec![messages::AXIS_REVERSED]);
}

#[test]
fn test_instrument_export_keeps_preamble() {
    let dir = TempDir::new().unwrap();
    let export = "Spectrometer: USB4F03499\nIntegration Time (sec): 0.1\n\
                  >>>>>Begin Spectral Data<<<<<\n\
                  345.39\t2.36\n345.61\t2.41\n345.82\t2.39\n";
    let path = write_file(&dir, "export.txt", export.as_bytes());
    let series = IngestEngine::new()
        .commit(&load(&path), &ColumnSelection::new().with_columns(0, 1))
        .unwrap();

    assert_eq!(series.x, vec![345.39, 345.61, 345.82]);
    assert_eq!(series.source_preamble.as_ref().map(Vec::len), Some(2));
    let metadata = series.source_metadata.unwrap();
    assert_eq!(metadata.get("Spectrometer").map(String::as_str), Some("USB4F03499"));
    assert!(series.warnings.contains(&messages::X_UNIT_MISSING.to_string()));
}

#[test]
fn test_right_aligned_export_commits_both_columns() {
    let dir = TempDir::new().unwrap();
    let export = "   500.000     1.000\n   750.500    12.500\n  1000.000   123.250\n  1250.000     7.125\n";
    let path = write_file(&dir, "aligned.dat", export.as_bytes());
    let engine = IngestEngine::new();
    let raw = load(&path);

    let preview = engine.preview(&raw, &PreviewOptions::default()).unwrap();
    assert_eq!(preview.delimiter, Some(Delimiter::Space));
    assert_eq!(preview.columns.len(), 2);
    assert_eq!(preview.suggested_x_index, Some(0));
    assert_eq!(preview.suggested_y_index, Some(1));

    let series = engine.commit(&raw, &ColumnSelection::new()).unwrap();
    assert_eq!(series.x, vec![500.0, 750.5, 1000.0, 1250.0]);
    assert_eq!(series.y, vec![1.0, 12.5, 123.25, 7.125]);
}

#[test]
fn test_fits_with_overflowing_column_width_does_not_panic() {
    let dir = TempDir::new().unwrap();
    let mut bytes = header_block(&[
        format!("{:<8}= {:>20}", "SIMPLE", "T"),
        format!("{:<8}= {:>20}", "BITPIX", 8),
        format!("{:<8}= {:>20}", "NAXIS", 0),
    ]);
    bytes.extend(header_block(&[
        format!("{:<8}= '{:<8}'", "XTENSION", "BINTABLE"),
        format!("{:<8}= {:>20}", "BITPIX", 8),
        format!("{:<8}= {:>20}", "NAXIS", 2),
        format!("{:<8}= {:>20}", "NAXIS1", 8),
        format!("{:<8}= {:>20}", "NAXIS2", 0),
        format!("{:<8}= {:>20}", "PCOUNT", 0),
        format!("{:<8}= {:>20}", "GCOUNT", 1),
        format!("{:<8}= {:>20}", "TFIELDS", 1),
        format!("{:<8}= '{:<8}'", "TFORM1", "9999999999999999999D"),
    ]));
    let path = write_file(&dir, "wide.fits", &bytes);

    let preview = IngestEngine::new()
        .preview(&load(&path), &PreviewOptions::default())
        .unwrap();
    assert!(preview.fits_hdu_candidates.as_ref().is_none_or(Vec::is_empty));
    assert!(preview.warnings.iter().any(|w| w.starts_with("Skipped FITS HDU 1")));
}

#[test]
fn test_fits_with_overflowing_primary_size_is_structural() {
    let dir = TempDir::new().unwrap();
    let bytes = header_block(&[
        format!("{:<8}= {:>20}", "SIMPLE", "T"),
        format!("{:<8}= {:>20}", "BITPIX", 8),
        format!("{:<8}= {:>20}", "NAXIS", 2),
        format!("{:<8}= {:>20}", "NAXIS1", i64::MAX),
        format!("{:<8}= {:>20}", "NAXIS2", 2),
    ]);
    let path = write_file(&dir, "huge.fits", &bytes);

    let err = IngestEngine::new()
        .commit(&load(&path), &ColumnSelection::new())
        .unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn test_jcamp_upload_expands_grid() {
    let dir = TempDir::new().unwrap();
    let jcamp = "##TITLE=Polystyrene film\n##JCAMP-DX=4.24\n##XUNITS=1/CM\n\
                 ##YUNITS=TRANSMITTANCE\n##FIRSTX=1000\n##DELTAX=1\n\
                 ##XYDATA=(X++(Y..Y))\n1000 1 2 3\n##END=\n";
    let path = write_file(&dir, "film.jdx", jcamp.as_bytes());
    let series = IngestEngine::new()
        .commit(&load(&path), &ColumnSelection::new())
        .unwrap();

    assert_eq!(series.parser, ParserKind::JcampDx);
    assert_eq!(series.title.as_deref(), Some("Polystyrene film"));
    assert_eq!(series.x, vec![1000.0, 1001.0, 1002.0]);
    assert_eq!(series.y, vec![1.0, 2.0, 3.0]);
    assert_eq!(series.x_unit.as_deref(), Some("1/CM"));
    assert!(series.warnings.is_empty());
}

#[test]
fn test_fits_upload_reads_units_and_reverses() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "spectrum.fits", &spectrum_fits(&decreasing_points()));
    let engine = IngestEngine::new();
    let raw = load(&path);

    let preview = engine.preview(&raw, &PreviewOptions::default()).unwrap();
    assert_eq!(preview.parser, ParserKind::Fits);
    assert_eq!(preview.hdu_index, Some(1));
    assert_eq!(preview.suggested_x_index, Some(0));
    assert_eq!(preview.suggested_y_index, Some(1));
    assert_eq!(preview.x_unit_hint.as_deref(), Some("Angstrom"));
    assert_eq!(preview.fits_hdu_candidates.as_ref().map(Vec::len), Some(1));

    let series = engine.commit(&raw, &ColumnSelection::new()).unwrap();
    assert_eq!(series.x, vec![4000.0, 5000.0, 6000.0]);
    assert_eq!(series.y, vec![1.0, 2.0, 3.0]);
    assert_eq!(series.y_unit.as_deref(), Some("erg/s/cm2/A"));
    assert_eq!(series.parser_decisions.hdu_name.as_deref(), Some("SPECTRUM"));
    assert_eq!(series.parser_decisions.canonicalization, CanonicalAction::Reversed);
}

#[test]
fn test_gzip_fits_matches_plain_fits() {
    let dir = TempDir::new().unwrap();
    let plain = spectrum_fits(&decreasing_points());
    let plain_path = write_file(&dir, "spectrum.fits", &plain);
    let gz_path = write_file(&dir, "spectrum.fits.gz", &gzip(&plain));
    let engine = IngestEngine::new();

    let from_plain = engine.commit(&load(&plain_path), &ColumnSelection::new()).unwrap();
    let from_gz = engine.commit(&load(&gz_path), &ColumnSelection::new()).unwrap();
    assert_eq!(from_gz.x, from_plain.x);
    assert_eq!(from_gz.y, from_plain.y);
    assert_eq!(from_gz.parser_decisions, from_plain.parser_decisions);
}

#[test]
fn test_oversized_upload_is_rejected_before_ingest() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "big.csv", &vec![b'1'; 2048]);

    let result = RawPayload::from_path(&path, 1024);
    assert!(matches!(
        result,
        Err(Error::InputTooLarge {
            size: 2048,
            limit: 1024,
            ..
        })
    ));
}

#[test]
fn test_unreadable_fits_is_structural() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "broken.fits", &vec![b'x'; 2880]);

    let err = IngestEngine::new()
        .commit(&load(&path), &ColumnSelection::new())
        .unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn test_series_serializes_with_parser_identity() {
    let raw = RawPayload::new("tiny.csv", "x,y\n1,2\n2,3\n");
    let series = IngestEngine::new()
        .commit(&raw, &ColumnSelection::new().with_columns(0, 1))
        .unwrap();

    let json: serde_json::Value = serde_json::to_value(&series).unwrap();
    assert_eq!(json["parser"], "delimited-text");
    assert_eq!(json["x_count"], 2);
    assert_eq!(json["parser_decisions"]["delimiter"], ",");
    assert_eq!(json["parser_decisions"]["canonicalization"], "none");
}

#[test]
fn test_engine_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync + Clone>() {}
    assert_send_sync::<IngestEngine>();

    let engine = IngestEngine::new();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                let text = format!("x,y\n{},1\n{},2\n", i, i + 1);
                let raw = RawPayload::new("t.csv", text);
                engine
                    .commit(&raw, &ColumnSelection::new().with_columns(0, 1))
                    .unwrap()
                    .x
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), vec![i as f64, i as f64 + 1.0]);
    }
}
