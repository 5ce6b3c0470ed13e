//! Cell-level normalization shared by both loaders and by request handling.
//!
//! Structural parsing happens first (the `;` delimiter never competes with the
//! `,` decimal separator); everything here operates on one already-split cell.

use crate::utils::constants::{HOUR_WIDTH, MAX_HOUR_VALUE, QUOTE_CHARS};
use std::cmp::Ordering;
use thiserror::Error;

/// Why a key cell could not be canonicalized.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyError {
    #[error("value is empty")]
    Empty,

    #[error("value is not a whole number")]
    NotInteger,

    #[error("value exceeds 9999")]
    OutOfRange,
}

/// Strip surrounding whitespace and a single layer of enclosing quotes.
pub fn clean_cell(raw: &str) -> &str {
    let trimmed = raw.trim();
    for quote in QUOTE_CHARS {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed[1..trimmed.len() - 1].trim();
        }
    }
    trimmed
}

/// Header form used for column matching: cleaned, lowercased, single-spaced.
pub fn normalize_header(raw: &str) -> String {
    clean_cell(raw.trim_start_matches('\u{feff}'))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Coerce a locale-formatted decimal ("5,3", "1.234,5", "7") to `f64`.
///
/// Anything that does not yield a finite number is missing.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let cell = clean_cell(raw);
    if cell.is_empty() {
        return None;
    }

    let normalized = if cell.contains(',') {
        let without_thousands = if cell.contains('.') {
            cell.replace('.', "")
        } else {
            cell.to_string()
        };
        without_thousands.replace(',', ".")
    } else {
        cell.to_string()
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Canonical point key: integers lose padding and sign noise ("01" -> "1",
/// "+4" -> "4", "-0" -> "0"); anything else is kept as trimmed text.
pub fn canonical_point(raw: &str) -> Result<String, KeyError> {
    let cell = clean_cell(raw);
    if cell.is_empty() {
        return Err(KeyError::Empty);
    }
    Ok(integer_key(cell).unwrap_or_else(|| cell.to_string()))
}

/// Canonical point key for caller input, which must be an integer.
pub fn canonical_point_query(raw: &str) -> Result<String, KeyError> {
    let cell = clean_cell(raw);
    if cell.is_empty() {
        return Err(KeyError::Empty);
    }
    integer_key(cell).ok_or(KeyError::NotInteger)
}

/// Textual integer canonicalization with no width limit: optional sign,
/// ASCII digits, leading zeros stripped.
fn integer_key(cell: &str) -> Option<String> {
    let (negative, digits) = split_integer(cell)?;
    if digits.is_empty() {
        Some("0".to_string())
    } else if negative {
        Some(format!("-{}", digits))
    } else {
        Some(digits.to_string())
    }
}

/// Sign and significant digits of an integer literal; `None` when `cell` is
/// not one. Zero comes back as non-negative with no digits.
fn split_integer(cell: &str) -> Option<(bool, &str)> {
    let (negative, body) = match cell.as_bytes().first()? {
        b'-' => (true, &cell[1..]),
        b'+' => (false, &cell[1..]),
        _ => (false, cell),
    };
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits = body.trim_start_matches('0');
    Some((negative && !digits.is_empty(), digits))
}

pub fn canonical_depth(raw: &str) -> Result<String, KeyError> {
    let cell = clean_cell(raw);
    if cell.is_empty() {
        Err(KeyError::Empty)
    } else {
        Ok(cell.to_string())
    }
}

pub fn canonical_date(raw: &str) -> Result<String, KeyError> {
    canonical_depth(raw)
}

/// Canonical hour key: digits only, zero-padded to four ("7" -> "0007").
pub fn canonical_hour(raw: &str) -> Result<String, KeyError> {
    let cell = clean_cell(raw);
    if cell.is_empty() {
        return Err(KeyError::Empty);
    }
    if !cell.bytes().all(|b| b.is_ascii_digit()) {
        return Err(KeyError::NotInteger);
    }

    let digits = cell.trim_start_matches('0');
    if digits.len() > HOUR_WIDTH {
        return Err(KeyError::OutOfRange);
    }
    let value: u32 = if digits.is_empty() {
        0
    } else {
        digits.parse().map_err(|_| KeyError::NotInteger)?
    };
    if value > MAX_HOUR_VALUE {
        return Err(KeyError::OutOfRange);
    }

    Ok(format!("{:0width$}", value, width = HOUR_WIDTH))
}

/// Ordering for point keys: integers numerically, then text lexicographically.
pub fn compare_points(a: &str, b: &str) -> Ordering {
    match (split_integer(a), split_integer(b)) {
        (Some(x), Some(y)) => compare_integers(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn compare_integers((a_neg, a): (bool, &str), (b_neg, b): (bool, &str)) -> Ordering {
    let magnitude = a.len().cmp(&b.len()).then_with(|| a.cmp(b));
    match (a_neg, b_neg) {
        (false, false) => magnitude,
        (true, true) => magnitude.reverse(),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_cell() {
        assert_eq!(clean_cell("  abc "), "abc");
        assert_eq!(clean_cell("\"0 a 20 cm\""), "0 a 20 cm");
        assert_eq!(clean_cell(" ' 5,3 ' "), "5,3");
        assert_eq!(clean_cell("\"\"x\"\""), "\"x\"");
        assert_eq!(clean_cell("\""), "\"");
        assert_eq!(clean_cell(""), "");
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("\u{feff}Talhão"), "talhão");
        assert_eq!(normalize_header(" \"Hora   (UTC)\" "), "hora (utc)");
        assert_eq!(normalize_header("Temp. Ins. (C)"), "temp. ins. (c)");
    }

    #[test]
    fn test_parse_decimal_comma() {
        assert_eq!(parse_decimal("5,3"), Some(5.3));
        assert_eq!(parse_decimal(" \"5,3\" "), Some(5.3));
        assert_eq!(parse_decimal("0,25"), Some(0.25));
        assert_eq!(parse_decimal("-1,5"), Some(-1.5));
        assert_eq!(parse_decimal("1.234,5"), Some(1234.5));
        assert_eq!(parse_decimal("5.3"), Some(5.3));
        assert_eq!(parse_decimal("12"), Some(12.0));
        assert_eq!(parse_decimal("0"), Some(0.0));
    }

    #[test]
    fn test_parse_decimal_missing() {
        for cell in ["", "  ", "-", "abc", "N/A", "nan", "inf", "5,3,1", "\"\""] {
            assert_eq!(parse_decimal(cell), None, "cell {:?}", cell);
        }
    }

    #[test]
    fn test_canonical_point() {
        assert_eq!(canonical_point(" 1 ").unwrap(), "1");
        assert_eq!(canonical_point("01").unwrap(), "1");
        assert_eq!(canonical_point("-3").unwrap(), "-3");
        assert_eq!(canonical_point("\"12\"").unwrap(), "12");
        assert_eq!(canonical_point("P1").unwrap(), "P1");
        assert_eq!(canonical_point("  "), Err(KeyError::Empty));
    }

    #[test]
    fn test_canonical_point_query() {
        assert_eq!(canonical_point_query("007").unwrap(), "7");
        assert_eq!(canonical_point_query("-2").unwrap(), "-2");
        assert_eq!(canonical_point_query("+4").unwrap(), "4");
        assert_eq!(canonical_point_query("-0").unwrap(), "0");
        assert_eq!(canonical_point_query("000").unwrap(), "0");
        assert_eq!(canonical_point_query("-").unwrap_err(), KeyError::NotInteger);
        assert_eq!(canonical_point_query("1.5"), Err(KeyError::NotInteger));
        assert_eq!(canonical_point_query("abc"), Err(KeyError::NotInteger));
        assert_eq!(canonical_point_query(""), Err(KeyError::Empty));
    }

    #[test]
    fn test_canonical_hour_padding_variants() {
        for raw in ["7", "07", "0007", " 7 ", "\"7\"", "00007"] {
            assert_eq!(canonical_hour(raw).unwrap(), "0007", "raw {:?}", raw);
        }
        assert_eq!(canonical_hour("0").unwrap(), "0000");
        assert_eq!(canonical_hour("1200").unwrap(), "1200");
        assert_eq!(canonical_hour("9999").unwrap(), "9999");
    }

    #[test]
    fn test_canonical_hour_rejects() {
        assert_eq!(canonical_hour("abc"), Err(KeyError::NotInteger));
        assert_eq!(canonical_hour("7h"), Err(KeyError::NotInteger));
        assert_eq!(canonical_hour("-7"), Err(KeyError::NotInteger));
        assert_eq!(canonical_hour("07:00"), Err(KeyError::NotInteger));
        assert_eq!(canonical_hour(""), Err(KeyError::Empty));
        assert_eq!(canonical_hour("10000"), Err(KeyError::OutOfRange));
    }

    #[test]
    fn test_compare_points() {
        let mut points = vec!["10", "2", "P1", "-1", "1", "A"];
        points.sort_by(|a, b| compare_points(a, b));
        assert_eq!(points, vec!["-1", "1", "2", "10", "A", "P1"]);
    }

    #[test]
    fn test_points_beyond_machine_integers() {
        let big = "99999999999999999999";
        assert_eq!(canonical_point(big).unwrap(), big);
        assert_eq!(canonical_point_query("0099999999999999999999").unwrap(), big);
        assert_eq!(canonical_point_query(&format!("-{}", big)).unwrap(), format!("-{}", big));

        let mut points = vec![big, "-100000000000000000000", "10", "-3"];
        points.sort_by(|a, b| compare_points(a, b));
        assert_eq!(points, vec!["-100000000000000000000", "-3", "10", big]);
    }
}
