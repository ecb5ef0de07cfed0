//! Tests for end-to-end JCAMP-DX parsing

use super::*;
use crate::app::services::jcamp_parser::parse_jcamp;
use crate::constants::messages;

#[test]
fn test_xpp_grid_expansion() {
    let spectrum = parse_jcamp(&create_xpp_file());
    assert_eq!(spectrum.x, vec![1000.0, 1001.0, 1002.0]);
    assert_eq!(spectrum.y, vec![1.0, 2.0, 3.0]);
    assert_eq!(spectrum.title.as_deref(), Some("Polystyrene film"));
    assert_eq!(spectrum.x_unit.as_deref(), Some("1/CM"));
    assert_eq!(spectrum.y_unit.as_deref(), Some("TRANSMITTANCE"));
    assert_eq!(spectrum.data_mode.as_deref(), Some("XYDATA=(X++(Y..Y))"));
    assert!(spectrum.warnings.is_empty());
}

#[test]
fn test_pairs_with_crlf_and_factors() {
    let spectrum = parse_jcamp(&create_pairs_file());
    assert_eq!(spectrum.x.len(), 3);
    assert_eq!(spectrum.y.len(), 3);
    assert!((spectrum.x[0] - 500.0).abs() < 1e-9);
    assert!((spectrum.x[2] - 502.0).abs() < 1e-9);
    assert!((spectrum.y[0] - 0.25).abs() < 1e-12);
    assert!((spectrum.y[2] - 0.27).abs() < 1e-12);
    assert_eq!(spectrum.x_unit.as_deref(), Some("NM"));
}

#[test]
fn test_missing_block_warns_and_returns_empty() {
    let spectrum = parse_jcamp("##TITLE=nothing here\n##JCAMP-DX=5.0\n##END=\n");
    assert!(spectrum.x.is_empty());
    assert_eq!(
        spectrum.warnings,
        vec![messages::JCAMP_NO_XYDATA, messages::JCAMP_EMPTY]
    );
    assert_eq!(spectrum.header.len(), 3);
}

#[test]
fn test_peak_table_fallback() {
    let spectrum = parse_jcamp("##TITLE=peaks\n##PEAK TABLE=(XY..XY)\n100,5 200,7\n##END=\n");
    assert_eq!(spectrum.x, vec![100.0, 200.0]);
    assert_eq!(spectrum.y, vec![5.0, 7.0]);
    assert_eq!(spectrum.warnings.len(), 2);
    assert_eq!(spectrum.warnings[0], messages::JCAMP_NO_XYDATA);
    assert!(spectrum.warnings[1].contains("PEAK TABLE"));
}

#[test]
fn test_blank_units_are_absent() {
    let spectrum = parse_jcamp("##XUNITS=\n##YUNITS=  \n##XYDATA=(XY..XY)\n1 2\n");
    assert_eq!(spectrum.x_unit, None);
    assert_eq!(spectrum.y_unit, None);
    assert_eq!(spectrum.x, vec![1.0]);
}

#[test]
fn test_records_after_xypoints_reach_the_header() {
    let text = "##TITLE=two blocks\n##XYPOINTS=(XY..XY)\n1,9 2,9\n\
                ##XUNITS=NM\n##YUNITS=ABSORBANCE\n##XYDATA=(XY..XY)\n500,1 501,2\n##END=\n";
    let spectrum = parse_jcamp(text);

    assert_eq!(spectrum.x, vec![500.0, 501.0]);
    assert_eq!(spectrum.y, vec![1.0, 2.0]);
    assert_eq!(spectrum.x_unit.as_deref(), Some("NM"));
    assert_eq!(spectrum.y_unit.as_deref(), Some("ABSORBANCE"));
    assert!(spectrum.warnings.is_empty());
}

#[test]
fn test_xypoints_only_file_falls_back() {
    let text = "##TITLE=points\n##XYPOINTS=(XY..XY)\n1,2 3,4\n##XUNITS=NM\n##END=\n";
    let spectrum = parse_jcamp(text);

    assert_eq!(spectrum.x, vec![1.0, 3.0]);
    assert_eq!(spectrum.x_unit.as_deref(), Some("NM"));
    assert_eq!(spectrum.warnings[0], messages::JCAMP_NO_XYDATA);
    assert!(spectrum.warnings[1].contains("XYPOINTS"));
}
