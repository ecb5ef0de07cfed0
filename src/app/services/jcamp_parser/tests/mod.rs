//! Tests for the JCAMP-DX decoder

mod parser_tests;

/// Minimal `(X++(Y..Y))` file with a uniform grid
pub fn create_xpp_file() -> String {
    r#"##TITLE=Polystyrene film
##JCAMP-DX=4.24
##DATA TYPE=INFRARED SPECTRUM
##XUNITS=1/CM
##YUNITS=TRANSMITTANCE
##XFACTOR=1
##YFACTOR=1
##FIRSTX=1000
##DELTAX=1
##NPOINTS=3
##XYDATA=(X++(Y..Y))
1000 1 2 3
##END=
"#
    .to_string()
}

/// `(XY..XY)` file with comma-separated pairs and scale factors
pub fn create_pairs_file() -> String {
    "##TITLE=UV-Vis\r\n##XUNITS=NM\r\n##YUNITS=ABSORBANCE\r\n##XFACTOR=0.1\r\n\
     ##YFACTOR=0.001\r\n##XYDATA=(XY..XY)\r\n5000,250 5010,260\r\n5020,270\r\n##END=\r\n"
        .to_string()
}
