//! Delimited-text parser: raw text → header list + row sequence.
//!
//! The input format is the semicolon-delimited export the hosted UI accepts:
//! first non-blank line is the header row, every following line is data.
//! Parsing is a pure function of the input text: re-parsing the same text
//! yields a structurally identical result.

use crate::error::SanitizeError;

pub const DELIMITER: char = ';';

/// One data row, positional and padded: `cells.len()` always equals the
/// header count (missing trailing cells become empty strings, extra cells
/// are dropped). Empty-string substitution with `None` happens later, in
/// canonicalization, never here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<String>,
}

impl RawRow {
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Parsed headers + rows. Header names are kept verbatim (trimmed only) so
/// a mapping UI can display the original column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSheet {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl ParsedSheet {
    /// Cell value for `header` in `row`, by the header's column position.
    pub fn value<'a>(&self, row: &'a RawRow, header: &str) -> Option<&'a str> {
        let idx = self.headers.iter().position(|h| h == header)?;
        Some(row.get(idx))
    }
}

/// Split on line breaks (any mix of `\n` and `\r`), trim, drop blanks.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Parse header + rows. Fails with `EmptyInput` when no non-blank line
/// remains.
pub fn parse_sheet(text: &str) -> Result<ParsedSheet, SanitizeError> {
    let lines = split_lines(text);
    let Some((first, rest)) = lines.split_first() else {
        return Err(SanitizeError::EmptyInput);
    };

    let headers: Vec<String> = first
        .split(DELIMITER)
        .map(|h| h.trim().to_string())
        .collect();

    let rows = rest
        .iter()
        .map(|line| {
            let mut cells: Vec<String> = line
                .split(DELIMITER)
                .take(headers.len())
                .map(|v| v.trim().to_string())
                .collect();
            cells.resize(headers.len(), String::new());
            RawRow { cells }
        })
        .collect();

    Ok(ParsedSheet { headers, rows })
}
