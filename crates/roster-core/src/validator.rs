//! Field validation and coercion
//!
//! Raw fields arrive as untrimmed text. Birth dates are recovered where
//! possible and otherwise dropped; salary and postcode are fatal when they
//! cannot be coerced.

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Width of a `ddmmyyyy` date string
const DATE_WIDTH: usize = 8;

/// Output format for birth dates
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Correct a raw `ddmmyyyy` string.
///
/// Upstream exports drop the leading zero of single-digit days, so a
/// 7-character value gets one `0` prepended. Anything that is not 8
/// characters after that is unparseable and yields an empty string.
pub fn correct_date(raw: &str) -> String {
    let trimmed = raw.trim();
    let corrected = if trimmed.chars().count() == DATE_WIDTH - 1 {
        format!("0{trimmed}")
    } else {
        trimmed.to_string()
    };

    if corrected.chars().count() != DATE_WIDTH {
        return String::new();
    }
    corrected
}

/// Parse a corrected `ddmmyyyy` string into a calendar date.
///
/// Returns `None` for empty input, non-digit characters, year `0000`, or
/// values that are not a real date (e.g. `31022001`).
pub fn parse_date(corrected: &str) -> Option<NaiveDate> {
    if corrected.len() != DATE_WIDTH || !corrected.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let day = corrected[0..2].parse().ok()?;
    let month = corrected[2..4].parse().ok()?;
    let year: i32 = corrected[4..8].parse().ok()?;
    if year < 1 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Render a date as `dd-mm-yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse the salary field as a finite floating-point number.
///
/// Single underscores between digits group thousands (`55_000`) and are
/// ignored.
pub fn parse_salary(raw: &str) -> Result<f64> {
    strip_digit_separators(raw.trim())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::Format {
            field: "Salary",
            value: raw.to_string(),
        })
}

/// Remove `_` separators, or `None` if one is not flanked by digits
fn strip_digit_separators(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.char_indices() {
        if c != '_' {
            out.push(c);
            continue;
        }
        let before = i.checked_sub(1).map(|j| bytes[j]);
        let after = bytes.get(i + 1).copied();
        match (before, after) {
            (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit() => {}
            _ => return None,
        }
    }
    Some(out)
}

/// Parse the postcode field as an integer
pub fn parse_postcode(raw: &str) -> Result<i64> {
    raw.trim().parse::<i64>().map_err(|_| Error::Validation {
        field: "Post",
        value: raw.to_string(),
    })
}
