//! Test utilities for the ingest engine
//!
//! Text fixtures are built inline; FITS fixtures come from the FITS reader
//! test helpers and are gzip-wrapped here when needed.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;

use crate::app::services::ingest_engine::IngestEngine;
use crate::models::RawPayload;


pub fn engine() -> IngestEngine {
    IngestEngine::new()
}

pub fn payload(file_name: &str, text: &str) -> RawPayload {
    RawPayload::new(file_name, text.as_bytes())
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// Decreasing CSV used by the reversal example
pub fn create_decreasing_csv() -> RawPayload {
    payload("decreasing.csv", "x,y\n3,30\n2,20\n1,10\n")
}

/// JCAMP-DX with a decreasing `(XY..XY)` block
pub fn create_decreasing_jcamp() -> RawPayload {
    payload(
        "ir.jdx",
        "##TITLE=Reversed\n##JCAMP-DX=5.01\n##XUNITS=1/CM\n##YUNITS=ABSORBANCE\n\
         ##XYDATA=(XY..XY)\n3 30 2 20\n1 10\n##END=\n",
    )
}
