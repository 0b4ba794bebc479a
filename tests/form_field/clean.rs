//! Strict JSON Cleaning Tests
//!
//! Tests for required handling, enrichment of temporal strings and syntax
//! error reporting.

use crate::*;
use jsonform::{Decimal, Error};
use std::str::FromStr;

// =============================================================================
// REQUIRED / OPTIONAL
// =============================================================================

#[test]
fn test_required_field_rejects_empty() {
    let field = strict_field();
    assert_eq!(field.clean(None).unwrap_err().message(), "This field is required.");
    assert_eq!(field.clean(Some("")).unwrap_err(), Error::Required);
}

#[test]
fn test_optional_field_returns_none_for_empty() {
    let field = JsonField::with_options(FieldOptions::new().required(false));
    assert_eq!(field.clean(None).unwrap(), None);
    assert_eq!(field.clean(Some("")).unwrap(), None);
}

#[test]
fn test_optional_field_still_validates_content() {
    let field = JsonField::with_options(FieldOptions::new().required(false));
    assert!(field.clean(Some("[")).is_err());
}

// =============================================================================
// ENRICHMENT
// =============================================================================

#[test]
fn test_date_string_becomes_date() {
    assert_eq!(clean_ok(&strict_field(), r#""2021-01-01""#), date(2021, 1, 1));
}

#[test]
fn test_impossible_date_stays_string() {
    assert_eq!(
        clean_ok(&strict_field(), r#""2021-13-45""#),
        Value::from("2021-13-45")
    );
}

#[test]
fn test_nested_enrichment_keeps_other_values() {
    let v = clean_ok(&strict_field(), r#"{"a": ["10:30:00", "not-a-date", 5]}"#);
    let expected: Value = vec![(
        "a",
        Value::Array(vec![time(10, 30, 0), Value::from("not-a-date"), Value::Int(5)]),
    )]
    .into_iter()
    .collect();
    assert_eq!(v, expected);
}

#[test]
fn test_keys_are_never_reinterpreted() {
    let v = clean_ok(&strict_field(), r#"{"2021-01-01": "2021-01-01"}"#);
    let map = v.as_object().unwrap();
    assert_eq!(map.get("2021-01-01"), Some(&date(2021, 1, 1)));
}

#[test]
fn test_timestamps_with_offsets() {
    let v = clean_ok(
        &strict_field(),
        r#"["2021-01-01T10:00:00Z", "2021-01-01T10:00:00-03:00", "2021-01-01T10:00:00"]"#,
    );
    let items = v.as_array().unwrap();
    let at = naive_datetime(2021, 1, 1, 10, 0, 0);
    assert_eq!(items[0], Value::DateTime(Timestamp::aware(at, offset(0))));
    assert_eq!(items[1], Value::DateTime(Timestamp::aware(at, offset(-3 * 3600))));
    assert_eq!(items[2], Value::DateTime(Timestamp::naive(at)));
}

#[test]
fn test_near_miss_formats_stay_strings() {
    for s in [
        "2021-01-01 10:00:00",
        "2021-1-1",
        "10:30",
        " 10:30:00",
        "2021-01-01T10:00:00+0500",
    ] {
        let json = format!("\"{}\"", s);
        assert_eq!(clean_ok(&strict_field(), &json), Value::from(s), "{:?}", s);
    }
}

#[test]
fn test_numbers_decode_exactly() {
    let v = clean_ok(&strict_field(), "[1, 0.1, 1e2, -0.0]");
    let items = v.as_array().unwrap();
    assert_eq!(items[0], Value::Int(1));
    assert_eq!(items[1], Value::Decimal(Decimal::from_str("0.1").unwrap()));
    assert!(matches!(items[2], Value::Decimal(_)));
    assert!(matches!(items[3], Value::Decimal(_)));
}

#[test]
fn test_carriage_returns_and_newlines_dropped() {
    let v = clean_ok(&strict_field(), "[\r\n  \"2021-01-01\",\n  true\r\n]");
    assert_eq!(v, Value::Array(vec![date(2021, 1, 1), Value::Bool(true)]));
}

// =============================================================================
// SYNTAX ERRORS
// =============================================================================

#[test]
fn test_malformed_json_reports_position() {
    assert_eq!(
        clean_err(&strict_field(), r#"{"a" 1}"#),
        "Expecting ':' delimiter: line 1 column 6 (char 5)"
    );
    assert_eq!(
        clean_err(&strict_field(), "[1, 2"),
        "Expecting ',' delimiter: line 1 column 6 (char 5)"
    );
    assert_eq!(
        clean_err(&strict_field(), "[1] x"),
        "Extra data: line 1 column 5 (char 4)"
    );
}

#[test]
fn test_position_counts_after_newline_removal() {
    // Newlines are gone before parsing, so everything is on line 1
    assert_eq!(
        clean_err(&strict_field(), "[1,\n]"),
        "Expecting value: line 1 column 4 (char 3)"
    );
}

#[test]
fn test_syntax_errors_are_flagged() {
    let err = strict_field().clean(Some("{'a': 1}")).unwrap_err();
    assert!(err.is_syntax());
    assert!(matches!(err, Error::Decode(_)));
}

// =============================================================================
// REDISPLAY
// =============================================================================

#[test]
fn test_prepare_value_round_trips_through_clean() {
    let field = strict_field();
    let original = r#"{"when":"2021-06-30T23:59:59.500+05:30","on":"2021-06-30","n":[1,"x"]}"#;
    let value = clean_ok(&field, original);
    assert_eq!(field.prepare_value(&value).unwrap(), original);
}

#[test]
fn test_prepare_value_aware_time_fails() {
    let aware = Value::Time(TimeOfDay::aware(
        NaiveTime::from_hms_opt(1, 0, 0).unwrap(),
        offset(3600),
    ));
    let err = strict_field().prepare_value(&aware).unwrap_err();
    assert_eq!(err.message(), "JSON can't represent timezone-aware times.");
}
