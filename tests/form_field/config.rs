//! Configuration Tests
//!
//! Tests for fields built from TOML and from explicit codecs.

use crate::*;
use jsonform::{Decimal, DecoderOptions, EncoderOptions, Error, JsonDecoder, JsonEncoder};
use std::str::FromStr;

#[test]
fn test_field_from_toml() {
    let field = JsonField::from_toml_str(
        r#"
        required = false
        evaluate = true

        [encoder]
        sort_keys = true
        "#,
    )
    .unwrap();

    assert_eq!(field.clean(None).unwrap(), None);
    let v = clean_ok(&field, "{'b': 1, 'a': 2}");
    assert_eq!(field.prepare_value(&v).unwrap(), r#"{"a":2,"b":1}"#);
}

#[test]
fn test_toml_can_disable_enrichment() {
    let field = JsonField::from_toml_str(
        r#"
        [decoder]
        float_mode = "decimal"
        enrich_temporal = false
        "#,
    )
    .unwrap();
    assert_eq!(clean_ok(&field, r#""2021-01-01""#), Value::from("2021-01-01"));
    assert_eq!(
        clean_ok(&field, "1.5"),
        Value::Decimal(Decimal::from_str("1.5").unwrap())
    );
}

#[test]
fn test_toml_depth_limit() {
    let field = JsonField::from_toml_str("[decoder]\nmax_depth = 2").unwrap();
    assert!(field.clean(Some("[[1]]")).is_ok());
    let err = field.clean(Some("[[[1]]]")).unwrap_err();
    assert!(err.message().starts_with("Maximum nesting depth exceeded"));
}

#[test]
fn test_invalid_toml_is_a_config_error() {
    let err = JsonField::from_toml_str("evaluate = 1").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_explicit_codec_overrides_options() {
    let codec = JsonCodec::new(
        JsonEncoder::with_options(EncoderOptions::new().ensure_ascii(true)),
        JsonDecoder::with_options(DecoderOptions::new().float_mode(FloatMode::Float)),
    );
    let field = JsonField::with_codec(FieldOptions::new(), codec);

    assert_eq!(clean_ok(&field, "0.25"), Value::Float(0.25));
    assert_eq!(
        field.prepare_value(&Value::from("caf\u{e9}")).unwrap(),
        r#""caf\u00e9""#
    );
}

#[test]
fn test_strict_nan_handling() {
    let field = JsonField::with_options(
        FieldOptions::new().decoder(DecoderOptions::new().allow_nan(false)),
    );
    assert!(field.clean(Some("NaN")).is_err());

    let lenient = JsonField::with_options(
        FieldOptions::new().decoder(DecoderOptions::new().float_mode(FloatMode::Float)),
    );
    assert!(matches!(clean_ok(&lenient, "NaN"), Value::Float(f) if f.is_nan()));
}
