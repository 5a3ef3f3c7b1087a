//! Numeric cleaning for locale-formatted export cells.
//!
//! Exports use a space as the thousands separator and a comma as the
//! decimal separator (`5 191,16`). Every cell resolves to an `f64`;
//! missing and unparseable cells become `0.0`.

/// Tokens treated as an absent value.
const MISSING_TOKENS: &[&str] = &["", "-", "na", "n/a", "nan", "null", "none", "#n/a"];

/// Characters stripped as thousands separators.
const THOUSANDS_SEPARATORS: &[char] = &[' ', '\u{00A0}', '\u{202F}', '\''];

/// A raw cell before cleaning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawCell<'a> {
    Missing,
    Number(f64),
    Text(&'a str),
}

impl<'a> From<Option<&'a str>> for RawCell<'a> {
    fn from(value: Option<&'a str>) -> Self {
        match value {
            Some(s) => RawCell::Text(s),
            None => RawCell::Missing,
        }
    }
}

/// Clean a typed cell. Numbers pass through unchanged except NaN.
pub fn clean_cell(cell: RawCell<'_>) -> f64 {
    match cell {
        RawCell::Missing => 0.0,
        RawCell::Number(n) if n.is_nan() => 0.0,
        RawCell::Number(n) => n,
        RawCell::Text(s) => parse_european(s).unwrap_or(0.0),
    }
}

/// Convert a European-formatted number string to a float.
///
/// `None`, blanks, missing-value tokens and garbage all yield `0.0`.
pub fn clean_european_number(value: Option<&str>) -> f64 {
    clean_cell(RawCell::from(value))
}

/// Parse a cell, returning `None` when it is missing or unparseable.
/// Used where the caller wants to count coercions.
pub fn parse_european(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return None;
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !THOUSANDS_SEPARATORS.contains(c))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match cleaned.parse::<f64>() {
        Ok(n) if n.is_nan() => None,
        Ok(n) => Some(n),
        Err(_) => None,
    }
}

/// True if the trimmed cell is one of the recognised missing-value tokens.
pub fn is_missing(trimmed: &str) -> bool {
    MISSING_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t))
}

/// Canonical text form for a cleaned number written back into a table.
pub fn format_number(value: f64) -> String {
    format!("{value}")
}
