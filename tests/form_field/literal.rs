//! Literal Mode Tests
//!
//! Tests for fields with `evaluate` enabled: literal syntax, the datetime
//! namespace, and the errors users see.

use crate::*;
use jsonform::{Decimal, Error, EvalError};
use std::str::FromStr;

// =============================================================================
// SYNTAX
// =============================================================================

#[test]
fn test_python_constants_and_json_constants() {
    let v = clean_ok(&literal_field(), "[None, True, False, null, true, false]");
    assert_eq!(
        v,
        Value::Array(vec![
            Value::Null,
            Value::Bool(true),
            Value::Bool(false),
            Value::Null,
            Value::Bool(true),
            Value::Bool(false),
        ])
    );
}

#[test]
fn test_quotes_tuples_and_trailing_commas() {
    let v = clean_ok(&literal_field(), "{'a': ('x', \"y\",), 'b': [1, 2,],}");
    assert_eq!(
        v.get("a"),
        Some(&Value::Array(vec![Value::from("x"), Value::from("y")]))
    );
    assert_eq!(
        v.get("b"),
        Some(&Value::Array(vec![Value::Int(1), Value::Int(2)]))
    );
}

#[test]
fn test_multiline_input_is_joined() {
    let v = clean_ok(&literal_field(), "{\n  'a': 1,\r\n  'b': 2\n}");
    assert_eq!(v.as_object().map(|m| m.len()), Some(2));
}

#[test]
fn test_non_string_keys_become_strings() {
    let v = clean_ok(&literal_field(), "{1: 'a', None: 'b', True: 'c'}");
    let keys: Vec<&String> = v.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["1", "null", "true"]);
}

#[test]
fn test_floats_decode_as_decimal() {
    let v = clean_ok(&literal_field(), "[0.5, -2.25]");
    assert_eq!(
        v,
        Value::Array(vec![
            Value::Decimal(Decimal::from_str("0.5").unwrap()),
            Value::Decimal(Decimal::from_str("-2.25").unwrap()),
        ])
    );
}

// =============================================================================
// DATETIME NAMESPACE
// =============================================================================

#[test]
fn test_date_constructor() {
    assert_eq!(
        clean_ok(&literal_field(), "datetime.date(2021, 1, 1)"),
        date(2021, 1, 1)
    );
}

#[test]
fn test_time_constructor_truncates_to_millis() {
    let v = clean_ok(&literal_field(), "datetime.time(10, 30, 0, 999999)");
    assert_eq!(
        v,
        Value::Time(TimeOfDay::naive(
            NaiveTime::from_hms_milli_opt(10, 30, 0, 999).unwrap()
        ))
    );
}

#[test]
fn test_utc_datetime_round_trips() {
    let v = clean_ok(
        &literal_field(),
        "datetime.datetime(2021, 1, 1, 12, tzinfo=datetime.timezone.utc)",
    );
    assert_eq!(
        v,
        Value::DateTime(Timestamp::aware(naive_datetime(2021, 1, 1, 12, 0, 0), offset(0)))
    );
}

#[test]
fn test_negative_offset() {
    let v = clean_ok(
        &literal_field(),
        "datetime.datetime(2021, 1, 1, \
         tzinfo=datetime.timezone(-datetime.timedelta(hours=3, minutes=30)))",
    );
    let ts = v.as_datetime().unwrap();
    assert_eq!(ts.offset(), Some(offset(-(3 * 3600 + 1800))));
}

#[test]
fn test_plain_strings_are_enriched_too() {
    assert_eq!(clean_ok(&literal_field(), "'2021-01-01'"), date(2021, 1, 1));
}

// =============================================================================
// ERRORS
// =============================================================================

#[test]
fn test_undefined_name() {
    assert_eq!(
        clean_err(&literal_field(), "__import__('os')"),
        "name '__import__' is not defined"
    );
}

#[test]
fn test_range_errors_use_familiar_messages() {
    assert_eq!(
        clean_err(&literal_field(), "datetime.date(2021, 13, 1)"),
        "month must be in 1..12"
    );
    assert_eq!(
        clean_err(&literal_field(), "datetime.date(2021, 4, 31)"),
        "day is out of range for month"
    );
}

#[test]
fn test_aware_time_is_an_encode_error() {
    let err = literal_field()
        .clean(Some("datetime.time(12, tzinfo=datetime.timezone.utc)"))
        .unwrap_err();
    assert!(matches!(err, Error::Encode(ref e) if e.is_domain_error()));
    assert_eq!(err.message(), "JSON can't represent timezone-aware times.");
}

#[test]
fn test_unserializable_results() {
    assert_eq!(
        clean_err(&literal_field(), "[datetime.timedelta(days=1)]"),
        "Object of type timedelta is not JSON serializable"
    );
    assert_eq!(
        clean_err(&literal_field(), "{1, 2}"),
        "Object of type set is not JSON serializable"
    );
    assert_eq!(
        clean_err(&literal_field(), "b'raw'"),
        "Object of type Bytes is not JSON serializable"
    );
}

#[test]
fn test_syntax_error_position() {
    let err = literal_field().clean(Some("{'a': [1, 2}")).unwrap_err();
    assert!(err.is_syntax());
    assert!(matches!(
        err,
        Error::Eval(EvalError::Syntax { line: 1, column: 12, .. })
    ));
}

#[test]
fn test_deep_nesting_is_a_validation_error() {
    let field = literal_field();
    for source in [
        format!("{}1{}", "[".repeat(5_000), "]".repeat(5_000)),
        format!("{}1", "-".repeat(5_000)),
    ] {
        let err = field.clean(Some(&source)).unwrap_err();
        assert!(err.is_syntax());
        assert!(err.message().starts_with("too many nested parentheses"));
    }

    let nested = format!("{}1{}", "[".repeat(100), "]".repeat(100));
    assert!(field.clean(Some(&nested)).is_ok());
}

#[test]
fn test_code_is_not_executed() {
    for source in [
        "lambda: 1",
        "[x for x in 'ab']",
        "1 if True else 2",
        "open('f').read()",
        "().__class__",
    ] {
        assert!(literal_field().clean(Some(source)).is_err(), "{:?}", source);
    }
}
