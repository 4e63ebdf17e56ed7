//! Date Tests
//!
//! Tests verify:
//! - Normalization to order-preserving `YYYY-MM-DD`
//! - Rejection of malformed dates
//! - Lenient comparison of invalid input
//! - DateKey parsing and display

use std::cmp::Ordering;

use menagerie::date::{self, YearWindow};
use menagerie::{DateKey, IndexKey, MenagerieError};

// =============================================================================
// Normalize Tests
// =============================================================================

#[test]
fn test_normalize_valid_date() {
    assert_eq!(date::normalize("05.03.2024").as_deref(), Some("2024-03-05"));
    assert_eq!(date::normalize("31.12.2025").as_deref(), Some("2025-12-31"));
    assert_eq!(date::normalize("01.01.2000").as_deref(), Some("2000-01-01"));
}

#[test]
fn test_normalize_rejects_wrong_shape() {
    for input in ["5.3.2024", "05-03-2024", "05.03.24", "2024.03.05", "", "05.03.2024 "] {
        assert_eq!(date::normalize(input), None, "{:?}", input);
    }
}

#[test]
fn test_normalize_rejects_non_numeric_fields() {
    for input in ["ab.03.2024", "05.x3.2024", "05.03.20z4", "+5.03.2024", "-1.03.2024"] {
        assert_eq!(date::normalize(input), None, "{:?}", input);
    }
}

#[test]
fn test_normalize_rejects_out_of_range_fields() {
    assert_eq!(date::normalize("00.03.2024"), None);
    assert_eq!(date::normalize("32.03.2024"), None);
    assert_eq!(date::normalize("05.00.2024"), None);
    assert_eq!(date::normalize("05.13.2024"), None);
    assert_eq!(date::normalize("05.03.1999"), None);
    assert_eq!(date::normalize("05.03.2026"), None);
}

#[test]
fn test_month_length_not_checked() {
    assert_eq!(date::normalize("31.02.2024").as_deref(), Some("2024-02-31"));
}

#[test]
fn test_custom_year_window() {
    let window = YearWindow::new(1990, 1999);
    assert!(date::is_valid_within("05.03.1995", window));
    assert!(!date::is_valid_within("05.03.2005", window));
    assert!(!date::is_valid("05.03.1995"));
}

#[test]
fn test_normalized_order_is_chronological() {
    let mut dates = vec!["02.01.2024", "31.12.2023", "15.06.2001", "01.02.2024"];
    dates.sort_by_key(|d| date::normalize(d).unwrap());
    assert_eq!(dates, vec!["15.06.2001", "31.12.2023", "02.01.2024", "01.02.2024"]);
}

// =============================================================================
// Compare Tests
// =============================================================================

#[test]
fn test_compare_valid_dates() {
    assert_eq!(date::compare("01.01.2024", "02.01.2024"), Ordering::Less);
    assert_eq!(date::compare("01.02.2024", "31.01.2024"), Ordering::Greater);
    assert_eq!(date::compare("10.10.2010", "10.10.2010"), Ordering::Equal);
}

#[test]
fn test_compare_invalid_reports_equal() {
    assert_eq!(date::compare("garbage", "01.01.2024"), Ordering::Equal);
    assert_eq!(date::compare("01.01.2024", "99.99.9999"), Ordering::Equal);
    assert_eq!(date::compare("", ""), Ordering::Equal);
}

// =============================================================================
// DateKey Tests
// =============================================================================

#[test]
fn test_date_key_round_trips_display_form() {
    let key = DateKey::parse("07.09.2021").unwrap();
    assert_eq!(key.normalized(), "2021-09-07");
    assert_eq!(key.display_form(), "07.09.2021");
    assert_eq!(key.to_string(), "07.09.2021");
}

#[test]
fn test_date_key_rejects_invalid() {
    let err = DateKey::parse("32.01.2024").unwrap_err();
    assert!(matches!(err, MenagerieError::InvalidDate(ref d) if d == "32.01.2024"));
}

#[test]
fn test_date_key_orders_chronologically() {
    let earlier = DateKey::parse("31.12.2023").unwrap();
    let later = DateKey::parse("01.01.2024").unwrap();

    assert_eq!(earlier.compare(&later), Ordering::Less);
    assert!(earlier < later);
}

#[test]
fn test_date_key_with_custom_window() {
    let window = YearWindow::new(2020, 2030);
    assert!(DateKey::parse_within("01.01.2030", window).is_ok());
    assert!(DateKey::parse("01.01.2030").is_err());
}
