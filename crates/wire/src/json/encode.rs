//! JSON encoding for jsonform values
//!
//! Typed leaves become canonical ECMA-262 date-time strings before the
//! generic serializer sees them:
//! - timestamps: `YYYY-MM-DDTHH:MM:SS[.mmm][±HH:MM|Z]`
//! - dates: `YYYY-MM-DD`
//! - naive times: `HH:MM:SS[.mmm]` (aware times are rejected)
//! - decimals: exact digits, scale preserved
//!
//! Sub-second parts are truncated to milliseconds, never rounded.

use chrono::{Datelike, FixedOffset, NaiveDate, Timelike};
use jsonform_core::{Map, TimeOfDay, Timestamp, Value};
use rust_decimal::Decimal;

use super::error::EncodeError;
use super::options::EncoderOptions;

/// Encoder turning value trees into JSON text
#[derive(Debug, Clone, Default)]
pub struct JsonEncoder {
    options: EncoderOptions,
}

impl JsonEncoder {
    /// Create an encoder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder with the given options
    pub fn with_options(options: EncoderOptions) -> Self {
        Self { options }
    }

    /// The options in effect
    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Encode a value tree to a JSON string
    pub fn encode(&self, value: &Value) -> Result<String, EncodeError> {
        match value {
            Value::Null => Ok("null".to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Int(i) => Ok(i.to_string()),
            Value::Float(f) => self.encode_float(*f),
            Value::String(s) => Ok(self.encode_str(s)),
            Value::Array(arr) => self.encode_array(arr),
            Value::Object(obj) => self.encode_object(obj),
            leaf => encode_leaf(leaf)?
                .map(|s| self.encode_str(&s))
                .ok_or(EncodeError::UnsupportedType {
                    type_name: leaf.type_name(),
                }),
        }
    }

    /// Encode a float, emitting JavaScript constants for non-finite values
    fn encode_float(&self, f: f64) -> Result<String, EncodeError> {
        if f.is_finite() {
            return Ok(format_normal_float(f));
        }
        if !self.options.allow_nan {
            return Err(EncodeError::NonFiniteFloat(f));
        }
        let constant = if f.is_nan() {
            "NaN"
        } else if f > 0.0 {
            "Infinity"
        } else {
            "-Infinity"
        };
        Ok(constant.to_string())
    }

    fn encode_str(&self, s: &str) -> String {
        if self.options.ensure_ascii {
            encode_string_ascii(s)
        } else {
            encode_string(s)
        }
    }

    /// Encode an array
    fn encode_array(&self, arr: &[Value]) -> Result<String, EncodeError> {
        let elements = arr
            .iter()
            .map(|v| self.encode(v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("[{}]", elements.join(",")))
    }

    /// Encode an object in insertion order, or sorted when configured
    fn encode_object(&self, obj: &Map) -> Result<String, EncodeError> {
        let mut entries: Vec<_> = obj.iter().collect();
        if self.options.sort_keys {
            entries.sort_by_key(|(k, _)| *k);
        }

        let pairs = entries
            .iter()
            .map(|(k, v)| Ok(format!("{}:{}", self.encode_str(k), self.encode(v)?)))
            .collect::<Result<Vec<_>, EncodeError>>()?;

        Ok(format!("{{{}}}", pairs.join(",")))
    }
}

/// Encode a value tree with default options
pub fn encode_json(value: &Value) -> Result<String, EncodeError> {
    JsonEncoder::new().encode(value)
}

/// Canonical string for a value plain JSON cannot represent
///
/// Returns `Ok(None)` for JSON-native values, which need no conversion, and
/// an error for values that have no encoding at all.
pub fn encode_leaf(value: &Value) -> Result<Option<String>, EncodeError> {
    match value {
        Value::DateTime(ts) => encode_datetime(ts).map(Some),
        Value::Date(d) => encode_date(*d).map(Some),
        Value::Time(t) => encode_time(t).map(Some),
        Value::Decimal(d) => Ok(Some(encode_decimal(d))),
        Value::Bytes(_) => Err(EncodeError::UnsupportedType {
            type_name: value.type_name(),
        }),
        _ => Ok(None),
    }
}

/// Encode a timestamp
///
/// A `+00:00` offset is written as `Z`.
pub fn encode_datetime(ts: &Timestamp) -> Result<String, EncodeError> {
    let dt = ts.naive_local();
    check_year(dt.year())?;
    check_leap_second(dt.nanosecond())?;

    let mut r = dt.format("%Y-%m-%dT%H:%M:%S").to_string();
    if ts.has_fraction() {
        r.push_str(&format_millis(dt.nanosecond()));
    }
    if let Some(offset) = ts.offset() {
        r.push_str(&format_offset(offset)?);
    }
    if let Some(stripped) = r.strip_suffix("+00:00") {
        r = format!("{}Z", stripped);
    }
    Ok(r)
}

/// Encode a calendar date
pub fn encode_date(date: NaiveDate) -> Result<String, EncodeError> {
    check_year(date.year())?;
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Encode a naive wall-clock time
pub fn encode_time(time: &TimeOfDay) -> Result<String, EncodeError> {
    if time.is_aware() {
        return Err(EncodeError::AwareTime);
    }
    let t = time.time();
    check_leap_second(t.nanosecond())?;
    let mut r = t.format("%H:%M:%S").to_string();
    if time.has_fraction() {
        r.push_str(&format_millis(t.nanosecond()));
    }
    Ok(r)
}

/// Encode a decimal with its exact digits
pub fn encode_decimal(d: &Decimal) -> String {
    d.to_string()
}

/// `.mmm` from a nanosecond field, truncated
fn format_millis(nanos: u32) -> String {
    format!(".{:03}", nanos / 1_000_000)
}

/// chrono stores a leap second as nanos >= 1_000_000_000, rendered as `:60`
fn check_leap_second(nanos: u32) -> Result<(), EncodeError> {
    if nanos >= 1_000_000_000 {
        Err(EncodeError::LeapSecond)
    } else {
        Ok(())
    }
}

/// `±HH:MM`
fn format_offset(offset: FixedOffset) -> Result<String, EncodeError> {
    let secs = offset.local_minus_utc();
    if secs % 60 != 0 {
        return Err(EncodeError::OffsetWithSeconds(offset));
    }
    let sign = if secs < 0 { '-' } else { '+' };
    let abs = secs.unsigned_abs();
    Ok(format!("{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60))
}

fn check_year(year: i32) -> Result<(), EncodeError> {
    if (1..=9999).contains(&year) {
        Ok(())
    } else {
        Err(EncodeError::YearOutOfRange(year))
    }
}

/// Format a finite float, ensuring it has a decimal point
///
/// Magnitudes from `1e-4` up to `1e16` are written positionally, others in
/// shortest exponent form with a signed two-digit exponent (`1e+16`,
/// `1.5e-05`).
fn format_normal_float(f: f64) -> String {
    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let s = format!("{:e}", f);
        if let Some((mantissa, exponent)) = s.split_once('e') {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            return format!("{}e{}{:0>2}", mantissa, sign, digits);
        }
    }

    let s = f.to_string();
    if s.contains('.') || s.contains('e') || s.contains('E') {
        s
    } else {
        format!("{}.0", s)
    }
}

/// Encode a string with proper JSON escaping
pub fn encode_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        push_escaped(&mut result, c);
    }
    result.push('"');
    result
}

/// Encode a string escaping everything outside ASCII
fn encode_string_ascii(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        if c.is_ascii() {
            push_escaped(&mut result, c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                result.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    result.push('"');
    result
}

fn push_escaped(result: &mut String, c: char) {
    match c {
        '"' => result.push_str("\\\""),
        '\\' => result.push_str("\\\\"),
        '\n' => result.push_str("\\n"),
        '\r' => result.push_str("\\r"),
        '\t' => result.push_str("\\t"),
        '\x08' => result.push_str("\\b"),
        '\x0c' => result.push_str("\\f"),
        c if c.is_control() => {
            result.push_str(&format!("\\u{:04x}", c as u32));
        }
        c => result.push(c),
    }
}
