//! Tests for text decoding and preamble extraction


/// Ocean Optics style export with a free-form header and a data marker
pub fn create_ocean_optics_export() -> String {
    r#"Data from example.txt Node

Date: Mon Nov 17 14:18:29 EST 2025
User: brett
Spectrometer: USB4F03499
XAxis mode: Wavelengths
Number of Pixels in Spectrum: 3
>>>>>Begin Spectral Data<<<<<
3.4539E2	2.364445E0
3.4561E2	2.364445E0
3.4582E2	2.364445E0
"#
    .to_string()
}

/// Comment-preamble export with key/value lines
pub fn create_commented_export() -> String {
    r#"# instrument = FTIR-9000
# operator: someone
// resolution: 4 cm-1
; scans=32

wavenumber,absorbance
4000,0.01
3999,0.02
"#
    .to_string()
}
