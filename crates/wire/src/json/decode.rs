//! JSON decoding for jsonform values
//!
//! Decoding runs in two passes:
//! 1. a strict JSON parse into a generic value tree
//! 2. an enrichment pass that reinterprets temporal-looking strings
//!
//! Syntax errors from the first pass always surface with their position.
//! The second pass never fails: strings that look temporal but name an
//! impossible value are left as they are.

use jsonform_core::{Map, Value};
use rust_decimal::Decimal;
use tracing::debug;

use super::error::{DecodeError, DecodeErrorKind};
use super::options::{DecoderOptions, FloatMode};
use super::temporal::parse_temporal;

/// Decoder turning JSON text into enriched value trees
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    options: DecoderOptions,
}

impl JsonDecoder {
    /// Create a decoder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with the given options
    pub fn with_options(options: DecoderOptions) -> Self {
        Self { options }
    }

    /// The options in effect
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Decode a JSON string to a value tree
    pub fn decode(&self, json: &str) -> Result<Value, DecodeError> {
        let mut parser = JsonParser::new(json, &self.options);
        let value = parser.parse_document()?;

        if self.options.enrich_temporal {
            Ok(enrich(value))
        } else {
            Ok(value)
        }
    }
}

/// Decode a JSON string with default options
pub fn decode_json(json: &str) -> Result<Value, DecodeError> {
    JsonDecoder::new().decode(json)
}

/// Reinterpret temporal-looking strings throughout a value tree
///
/// Array elements and object values are visited recursively; object keys
/// are never touched.
pub fn enrich(mut value: Value) -> Value {
    enrich_in_place(&mut value);
    value
}

fn enrich_in_place(value: &mut Value) {
    let replacement = match value {
        Value::Array(items) => {
            items.iter_mut().for_each(enrich_in_place);
            None
        }
        Value::Object(map) => {
            map.values_mut().for_each(enrich_in_place);
            None
        }
        Value::String(s) => parse_temporal(s),
        _ => None,
    };

    if let Some(parsed) = replacement {
        *value = parsed;
    }
}

/// Strict JSON parser
struct JsonParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
    options: &'a DecoderOptions,
}

impl<'a> JsonParser<'a> {
    fn new(input: &'a str, options: &'a DecoderOptions) -> Self {
        JsonParser {
            input,
            pos: 0,
            depth: 0,
            options,
        }
    }

    fn error_at(&self, kind: DecodeErrorKind, pos: usize) -> DecodeError {
        DecodeError::at(kind, self.input, pos)
    }

    fn error(&self, kind: DecodeErrorKind) -> DecodeError {
        self.error_at(kind, self.pos)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    /// Skip JSON whitespace (space, tab, line feed, carriage return)
    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\n' | '\r') = self.peek() {
            self.advance();
        }
    }

    /// Consume `literal` if the input continues with it
    fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    fn parse_document(&mut self) -> Result<Value, DecodeError> {
        let value = self.parse_value()?;
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(self.error(DecodeErrorKind::ExtraData));
        }
        Ok(value)
    }

    fn parse_value(&mut self) -> Result<Value, DecodeError> {
        self.skip_whitespace();

        match self.peek() {
            Some('"') => return self.parse_string().map(Value::String),
            Some('[') => return self.nested(Self::parse_array),
            Some('{') => return self.nested(Self::parse_object),
            _ => {}
        }

        if let Some(constant) = self.parse_constant() {
            return Ok(constant);
        }

        match self.peek() {
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            _ => Err(self.error(DecodeErrorKind::ExpectingValue)),
        }
    }

    /// `null`, `true`, `false`, and the non-finite constants when allowed
    fn parse_constant(&mut self) -> Option<Value> {
        if self.eat("null") {
            return Some(Value::Null);
        }
        if self.eat("true") {
            return Some(Value::Bool(true));
        }
        if self.eat("false") {
            return Some(Value::Bool(false));
        }
        if self.options.allow_nan {
            if self.eat("NaN") {
                return Some(Value::Float(f64::NAN));
            }
            if self.eat("Infinity") {
                return Some(Value::Float(f64::INFINITY));
            }
            if self.eat("-Infinity") {
                return Some(Value::Float(f64::NEG_INFINITY));
            }
        }
        None
    }

    /// Run a container parser one nesting level deeper
    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Value, DecodeError>,
    ) -> Result<Value, DecodeError> {
        if self.depth >= self.options.max_depth {
            return Err(self.error(DecodeErrorKind::DepthLimitExceeded));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_string(&mut self) -> Result<String, DecodeError> {
        let start = self.pos;
        self.advance(); // consume opening quote
        let mut result = String::new();

        loop {
            match self.peek() {
                None => return Err(self.error_at(DecodeErrorKind::UnterminatedString, start)),
                Some('"') => {
                    self.advance();
                    return Ok(result);
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('b') => '\x08',
                        Some('f') => '\x0c',
                        Some('u') => {
                            self.advance();
                            result.push(self.parse_unicode_escape()?);
                            continue;
                        }
                        None => {
                            return Err(self.error_at(DecodeErrorKind::UnterminatedString, start))
                        }
                        Some(_) => return Err(self.error(DecodeErrorKind::InvalidEscape)),
                    };
                    result.push(escaped);
                    self.advance();
                }
                Some(c) if c < '\x20' => {
                    return Err(self.error(DecodeErrorKind::InvalidControlCharacter))
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }
    }

    /// Four hex digits after `\u`, combining surrogate pairs
    fn parse_unicode_escape(&mut self) -> Result<char, DecodeError> {
        let escape_pos = self.pos;
        let high = self.parse_hex4()?;

        let code = if (0xD800..0xDC00).contains(&high) {
            if !self.eat("\\u") {
                return Err(self.error_at(DecodeErrorKind::InvalidUnicodeEscape, escape_pos));
            }
            let low = self.parse_hex4()?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.error_at(DecodeErrorKind::InvalidUnicodeEscape, escape_pos));
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };

        char::from_u32(code)
            .ok_or_else(|| self.error_at(DecodeErrorKind::InvalidUnicodeEscape, escape_pos))
    }

    fn parse_hex4(&mut self) -> Result<u32, DecodeError> {
        let hex = self.rest().get(..4).filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()));
        let code = hex
            .and_then(|h| u32::from_str_radix(h, 16).ok())
            .ok_or_else(|| self.error(DecodeErrorKind::InvalidUnicodeEscape))?;
        self.pos += 4;
        Ok(code)
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        self.pos - start
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    fn parse_number(&mut self) -> Result<Value, DecodeError> {
        let start = self.pos;

        // Handle negative sign
        if self.peek() == Some('-') {
            self.advance();
        }

        // Integer part: a lone zero or digits without leading zero
        match self.peek() {
            Some('0') => self.advance(),
            Some(c) if c.is_ascii_digit() => {
                self.skip_digits();
            }
            _ => return Err(self.error_at(DecodeErrorKind::ExpectingValue, start)),
        }

        let mut is_float = false;

        // Fraction only counts when a digit follows the point
        if self.peek() == Some('.') && self.peek_at(1).map_or(false, |b| b.is_ascii_digit()) {
            is_float = true;
            self.advance();
            self.skip_digits();
        }

        // Exponent only counts when digits follow
        if let Some('e' | 'E') = self.peek() {
            let sign = matches!(self.peek_at(1), Some(b'+' | b'-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.peek_at(digit_at).map_or(false, |b| b.is_ascii_digit()) {
                is_float = true;
                self.pos += digit_at;
                self.skip_digits();
            }
        }

        let num_str = &self.input[start..self.pos];
        Ok(self.number_value(num_str, is_float))
    }

    /// Convert validated number text according to the float mode
    fn number_value(&self, num_str: &str, is_float: bool) -> Value {
        if !is_float {
            if let Ok(i) = num_str.parse::<i64>() {
                return Value::Int(i);
            }
        }

        if self.options.float_mode == FloatMode::Decimal {
            let exact = if num_str.contains(['e', 'E']) {
                Decimal::from_scientific(num_str)
            } else {
                Decimal::from_str_exact(num_str)
            };
            match exact {
                Ok(d) => return Value::Decimal(d),
                Err(e) => debug!(number = num_str, error = %e, "number exceeds decimal range, using float"),
            }
        }

        // Grammar was checked above, so only overflow to infinity remains
        Value::Float(num_str.parse::<f64>().unwrap_or(f64::NAN))
    }

    fn parse_array(&mut self) -> Result<Value, DecodeError> {
        self.advance(); // consume '['
        self.skip_whitespace();

        let mut arr = Vec::new();

        if self.peek() == Some(']') {
            self.advance();
            return Ok(Value::Array(arr));
        }

        loop {
            arr.push(self.parse_value()?);
            self.skip_whitespace();

            match self.peek() {
                Some(',') => self.advance(),
                Some(']') => {
                    self.advance();
                    return Ok(Value::Array(arr));
                }
                _ => return Err(self.error(DecodeErrorKind::ExpectingComma)),
            }
        }
    }

    fn parse_object(&mut self) -> Result<Value, DecodeError> {
        self.advance(); // consume '{'
        self.skip_whitespace();

        let mut map = Map::new();

        if self.peek() == Some('}') {
            self.advance();
            return Ok(Value::Object(map));
        }

        loop {
            self.skip_whitespace();

            // Parse key
            if self.peek() != Some('"') {
                return Err(self.error(DecodeErrorKind::ExpectingPropertyName));
            }
            let key = self.parse_string()?;

            self.skip_whitespace();

            // Expect colon
            if self.peek() != Some(':') {
                return Err(self.error(DecodeErrorKind::ExpectingColon));
            }
            self.advance();

            // Later duplicates replace the value but keep the first position
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace();

            match self.peek() {
                Some(',') => self.advance(),
                Some('}') => {
                    self.advance();
                    return Ok(Value::Object(map));
                }
                _ => return Err(self.error(DecodeErrorKind::ExpectingComma)),
            }
        }
    }
}
