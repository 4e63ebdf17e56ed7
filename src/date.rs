//! Date keys
//!
//! Turns display dates (`DD.MM.YYYY`) into `YYYY-MM-DD` strings whose
//! lexicographic order is chronological, so a date-keyed ordered index can
//! compare plain strings.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{MenagerieError, Result};
use crate::tree::IndexKey;

/// Inclusive range of accepted years
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    pub min: u32,
    pub max: u32,
}

impl YearWindow {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, year: u32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

impl Default for YearWindow {
    fn default() -> Self {
        Self::new(2000, 2025)
    }
}

/// Normalize with the default year window
pub fn normalize(date: &str) -> Option<String> {
    normalize_within(date, YearWindow::default())
}

/// Convert `DD.MM.YYYY` into zero-padded `YYYY-MM-DD`
///
/// Rejects a wrong length, separators outside positions 2 and 5, non-digit
/// fields, a day outside 1..=31, a month outside 1..=12 and a year outside
/// `window`. Month lengths are not checked.
pub fn normalize_within(date: &str, window: YearWindow) -> Option<String> {
    let bytes = date.as_bytes();
    if bytes.len() != 10 || bytes[2] != b'.' || bytes[5] != b'.' {
        return None;
    }

    let day = parse_digits(&date[0..2])?;
    let month = parse_digits(&date[3..5])?;
    let year = parse_digits(&date[6..10])?;

    if !(1..=31).contains(&day) || !(1..=12).contains(&month) || !window.contains(year) {
        return None;
    }

    Some(format!("{:04}-{:02}-{:02}", year, month, day))
}

/// Whether `date` normalizes under the default year window
pub fn is_valid(date: &str) -> bool {
    normalize(date).is_some()
}

pub fn is_valid_within(date: &str, window: YearWindow) -> bool {
    normalize_within(date, window).is_some()
}

/// Chronological comparison of two display dates
///
/// Reports `Equal` whenever either side fails to normalize. Use
/// [`is_valid`] to reject malformed input; this never does.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (normalize(a), normalize(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => Ordering::Equal,
    }
}

/// All-ASCII-digit field to number; `None` on anything else
fn parse_digits(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Validated date usable as an ordered-index key
///
/// Ordered chronologically; displayed in `DD.MM.YYYY` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey {
    /// Normalized `YYYY-MM-DD`
    normalized: String,
}

impl DateKey {
    /// Parse a display date with the default year window
    pub fn parse(date: &str) -> Result<Self> {
        Self::parse_within(date, YearWindow::default())
    }

    pub fn parse_within(date: &str, window: YearWindow) -> Result<Self> {
        normalize_within(date, window)
            .map(|normalized| Self { normalized })
            .ok_or_else(|| MenagerieError::InvalidDate(date.to_string()))
    }

    /// The `YYYY-MM-DD` form
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// The `DD.MM.YYYY` form
    pub fn display_form(&self) -> String {
        let n = &self.normalized;
        format!("{}.{}.{}", &n[8..10], &n[5..7], &n[0..4])
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_form())
    }
}

impl IndexKey for DateKey {
    fn compare(&self, other: &Self) -> Ordering {
        self.normalized.cmp(&other.normalized)
    }
}
