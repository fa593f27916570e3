//! Raw input decoding: strict UTF-8 first, Latin-1 (windows-1252) fallback.
//!
//! Contact lists exported from spreadsheet tools are frequently Latin-1
//! encoded; the fallback mirrors what the hosted UI does with
//! `TextDecoder('latin1')`. A leading byte-order mark is stripped so it can
//! never leak into the first header name.

use crate::error::SanitizeError;

pub fn decode_input(bytes: &[u8]) -> Result<String, SanitizeError> {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Ok(strip_bom(s).to_string());
    }

    let (text, _encoding, had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
    if had_errors {
        return Err(SanitizeError::Decode);
    }
    Ok(strip_bom(&text).to_string())
}

fn strip_bom(s: &str) -> &str {
    s.strip_prefix('\u{feff}').unwrap_or(s)
}
