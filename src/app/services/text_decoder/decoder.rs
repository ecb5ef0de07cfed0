//! Byte-to-text decoding with a fixed fallback chain
//!
//! Encodings are tried in order `utf-8-sig`, `utf-8`, `latin-1`; the first
//! successful decode wins. Latin-1 maps every byte to a code point, so the
//! chain never fails.

use encoding_rs::UTF_8;
use tracing::debug;

use crate::constants::UTF8_BOM;
use crate::models::{DecodedText, TextEncoding};

type StrictDecoder = fn(&[u8]) -> Option<String>;

/// Strict decoders tried before the latin-1 fallback, in order
const STRICT_DECODERS: &[(TextEncoding, StrictDecoder)] = &[
    (TextEncoding::Utf8Sig, decode_utf8_sig),
    (TextEncoding::Utf8, decode_utf8),
];

/// Decode raw bytes into text, reporting the encoding that succeeded
pub fn decode_text(raw: &[u8]) -> DecodedText {
    for (encoding, decode) in STRICT_DECODERS {
        if let Some(text) = decode(raw) {
            return DecodedText {
                text,
                encoding: *encoding,
            };
        }
    }

    debug!("Payload is not valid UTF-8; falling back to latin-1");
    DecodedText {
        text: encoding_rs::mem::decode_latin1(raw).into_owned(),
        encoding: TextEncoding::Latin1,
    }
}

/// UTF-8 with an optional leading byte order mark removed
fn decode_utf8_sig(raw: &[u8]) -> Option<String> {
    let body = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
    decode_utf8(body)
}

fn decode_utf8(raw: &[u8]) -> Option<String> {
    UTF_8
        .decode_without_bom_handling_and_without_replacement(raw)
        .map(|text| text.into_owned())
}
