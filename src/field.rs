//! The JSON form field.
//!
//! A [`JsonField`] validates submitted text and turns it into a value tree:
//!
//! ```
//! use jsonform::{JsonField, Value};
//!
//! let field = JsonField::new();
//! let value = field.clean(Some(r#"{"start": "2021-01-01"}"#)).unwrap().unwrap();
//! assert!(matches!(value.get("start"), Some(Value::Date(_))));
//!
//! let err = field.clean(Some("{")).unwrap_err();
//! assert_eq!(
//!     err.message(),
//!     "Expecting property name enclosed in double quotes: line 1 column 2 (char 1)"
//! );
//! ```

use jsonform_wire::{literal, JsonCodec, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::options::FieldOptions;

/// A form field holding a JSON document.
#[derive(Debug, Clone)]
pub struct JsonField {
    options: FieldOptions,
    codec: JsonCodec,
}

impl JsonField {
    /// A required, strict-JSON field with default options.
    pub fn new() -> Self {
        Self::with_options(FieldOptions::default())
    }

    /// A field whose codec is built from `options`.
    pub fn with_options(options: FieldOptions) -> Self {
        let codec = options.codec();
        Self { options, codec }
    }

    /// A field using an explicitly constructed codec.
    ///
    /// The encoder and decoder settings in `options` are ignored in favor of
    /// the codec's own.
    pub fn with_codec(options: FieldOptions, codec: JsonCodec) -> Self {
        Self { options, codec }
    }

    /// Load field options from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(Self::with_options(FieldOptions::from_toml_str(source)?))
    }

    /// The field's options.
    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// The codec used for decoding and rendering.
    pub fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    /// Validate submitted text.
    ///
    /// Returns `Ok(None)` for empty input on an optional field, rather than
    /// the "Expecting value" error a decode of `""` would give. Carriage
    /// returns and newlines are removed before parsing; JSON escapes them
    /// inside strings, so only layout is lost.
    pub fn clean(&self, input: Option<&str>) -> Result<Option<Value>> {
        let result = self.clean_inner(input);
        if let Err(e) = &result {
            debug!(
                evaluate = self.options.evaluate,
                error = %e,
                "field validation failed"
            );
        }
        result
    }

    fn clean_inner(&self, input: Option<&str>) -> Result<Option<Value>> {
        let text = match input {
            Some(text) if !text.is_empty() => text,
            _ if self.options.required => return Err(Error::Required),
            _ => return Ok(None),
        };

        let text: String = text.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();

        if self.options.evaluate {
            let json = literal::evaluate_to_json(&text, self.codec.encoder())?;
            return Ok(Some(self.codec.decode(&json)?));
        }
        Ok(Some(self.codec.decode(&text)?))
    }

    /// Render a value as JSON text for redisplay in the form.
    pub fn prepare_value(&self, value: &Value) -> Result<String> {
        Ok(self.codec.encode(value)?)
    }
}

impl Default for JsonField {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonform_wire::chrono::Timelike;
    use jsonform_wire::{DecodeErrorKind, Decimal, EncodeError, EvalError};
    use std::str::FromStr;

    fn clean(field: &JsonField, input: &str) -> Result<Value> {
        field.clean(Some(input)).map(|v| v.expect("non-empty input yields a value"))
    }

    fn literal_field() -> JsonField {
        JsonField::with_options(FieldOptions::new().evaluate(true))
    }

    // === Required ===

    #[test]
    fn test_required_rejects_missing_and_empty() {
        let field = JsonField::new();
        assert_eq!(field.clean(None), Err(Error::Required));
        assert_eq!(field.clean(Some("")), Err(Error::Required));
    }

    #[test]
    fn test_optional_allows_missing_and_empty() {
        let field = JsonField::with_options(FieldOptions::new().required(false));
        assert_eq!(field.clean(None), Ok(None));
        assert_eq!(field.clean(Some("")), Ok(None));
    }

    #[test]
    fn test_whitespace_only_is_not_empty() {
        let field = JsonField::with_options(FieldOptions::new().required(false));
        let err = field.clean(Some("  ")).unwrap_err();
        assert!(matches!(err, Error::Decode(ref e) if e.kind == DecodeErrorKind::ExpectingValue));
    }

    // === Strict JSON ===

    #[test]
    fn test_newlines_removed() {
        let field = JsonField::new();
        let v = clean(&field, "{\r\n\"a\":\n[1,\r2]\n}").unwrap();
        assert_eq!(
            v.get("a"),
            Some(&Value::Array(vec![Value::Int(1), Value::Int(2)]))
        );
    }

    #[test]
    fn test_floats_decode_as_decimal() {
        let v = clean(&JsonField::new(), "[1.10, 2]").unwrap();
        assert_eq!(
            v,
            Value::Array(vec![
                Value::Decimal(Decimal::from_str("1.10").unwrap()),
                Value::Int(2),
            ])
        );
    }

    #[test]
    fn test_strings_enriched() {
        let v = clean(&JsonField::new(), r#"["10:30:00", "2021-13-45"]"#).unwrap();
        let items = v.as_array().unwrap();
        assert!(matches!(items[0], Value::Time(_)));
        assert_eq!(items[1], Value::from("2021-13-45"));
    }

    #[test]
    fn test_syntax_error_carries_position() {
        let err = clean(&JsonField::new(), r#"{"a": 1,}"#).unwrap_err();
        assert_eq!(
            err.message(),
            "Expecting property name enclosed in double quotes: line 1 column 9 (char 8)"
        );
    }

    #[test]
    fn test_literal_syntax_rejected_without_evaluate() {
        let err = clean(&JsonField::new(), "{'a': 1}").unwrap_err();
        assert!(err.is_syntax());
    }

    // === Literal mode ===

    #[test]
    fn test_literal_mode_accepts_python_style() {
        let v = clean(&literal_field(), "{'a': (1, True, None), 'b': 'x',}").unwrap();
        assert_eq!(
            v.get("a"),
            Some(&Value::Array(vec![Value::Int(1), Value::Bool(true), Value::Null]))
        );
    }

    #[test]
    fn test_literal_mode_goes_through_codec() {
        let v = clean(
            &literal_field(),
            "{'when': datetime.datetime(2021, 1, 1, 10, 30, 0, 123456), 'n': 1.5}",
        )
        .unwrap();
        let when = v.get("when").and_then(Value::as_datetime).unwrap();
        assert_eq!(when.time().nanosecond(), 123_000_000);
        assert_eq!(v.get("n"), Some(&Value::Decimal(Decimal::from_str("1.5").unwrap())));
    }

    #[test]
    fn test_literal_mode_still_accepts_json() {
        let v = clean(&literal_field(), r#"{"a": [true, false, null]}"#).unwrap();
        assert_eq!(
            v.get("a"),
            Some(&Value::Array(vec![Value::Bool(true), Value::Bool(false), Value::Null]))
        );
    }

    #[test]
    fn test_literal_mode_errors() {
        let field = literal_field();
        assert_eq!(
            clean(&field, "[x]").unwrap_err(),
            Error::Eval(EvalError::UndefinedName("x".into()))
        );
        assert_eq!(
            clean(&field, "datetime.time(1, tzinfo=datetime.timezone.utc)").unwrap_err(),
            Error::Encode(EncodeError::AwareTime)
        );
        assert_eq!(
            clean(&field, "datetime.timedelta(1)").unwrap_err().message(),
            "Object of type timedelta is not JSON serializable"
        );
    }

    // === Redisplay ===

    #[test]
    fn test_prepare_value() {
        let field = JsonField::new();
        let v = clean(&field, r#"{"d": "2021-01-01", "x": 1.50}"#).unwrap();
        assert_eq!(field.prepare_value(&v).unwrap(), r#"{"d":"2021-01-01","x":"1.50"}"#);
    }

    #[test]
    fn test_prepare_value_rejects_bytes() {
        let err = JsonField::new()
            .prepare_value(&Value::Bytes(vec![1]))
            .unwrap_err();
        assert!(matches!(err, Error::Encode(ref e) if e.is_type_error()));
    }

    #[test]
    fn test_field_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JsonField>();
    }
}
