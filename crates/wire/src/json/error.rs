//! Codec error types
//!
//! Encoding failures fall into two classes:
//! - type errors: the value has no JSON encoding at all (`Bytes`)
//! - domain errors: the value is of a supported type but this particular
//!   value cannot be represented (aware times, leap seconds, out-of-range
//!   years)
//!
//! Decoding failures are always syntax errors with a position attached.

use chrono::FixedOffset;
use thiserror::Error;

/// Encode error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodeError {
    /// The value has no known JSON encoding
    #[error("Object of type {type_name} is not JSON serializable")]
    UnsupportedType {
        /// Type name of the offending value
        type_name: &'static str,
    },

    /// Times carrying a UTC offset have no JSON representation
    #[error("JSON can't represent timezone-aware times.")]
    AwareTime,

    /// NaN or infinity with `allow_nan` disabled
    #[error("Out of range float values are not JSON compliant: {0}")]
    NonFiniteFloat(f64),

    /// Year outside the four-digit range the decoder recognizes
    #[error("year {0} is out of range")]
    YearOutOfRange(i32),

    /// chrono leap second (`:60`), which the decoder never matches
    #[error("JSON can't represent leap seconds.")]
    LeapSecond,

    /// UTC offset with a seconds component
    #[error("UTC offset {0} has a seconds component and can't be represented")]
    OffsetWithSeconds(FixedOffset),
}

impl EncodeError {
    /// True for errors caused by the value's type
    pub fn is_type_error(&self) -> bool {
        matches!(self, EncodeError::UnsupportedType { .. })
    }

    /// True for errors caused by the value itself
    pub fn is_domain_error(&self) -> bool {
        !self.is_type_error()
    }
}

/// What went wrong while decoding
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// No JSON value starts at the position
    #[error("Expecting value")]
    ExpectingValue,

    /// Object key missing or not a string
    #[error("Expecting property name enclosed in double quotes")]
    ExpectingPropertyName,

    /// Missing `:` between key and value
    #[error("Expecting ':' delimiter")]
    ExpectingColon,

    /// Missing `,` between elements
    #[error("Expecting ',' delimiter")]
    ExpectingComma,

    /// String without closing quote; position is the opening quote
    #[error("Unterminated string starting at")]
    UnterminatedString,

    /// Raw control character inside a string
    #[error("Invalid control character at")]
    InvalidControlCharacter,

    /// Unknown backslash escape
    #[error("Invalid \\escape")]
    InvalidEscape,

    /// Malformed `\uXXXX` escape or unpaired surrogate
    #[error("Invalid \\uXXXX escape")]
    InvalidUnicodeEscape,

    /// Trailing content after the top-level value
    #[error("Extra data")]
    ExtraData,

    /// Nesting deeper than the configured limit
    #[error("Maximum nesting depth exceeded")]
    DepthLimitExceeded,
}

/// Decode error with position information
///
/// `offset` counts characters from the start of the input; `line` and
/// `column` are 1-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}: line {line} column {column} (char {offset})")]
pub struct DecodeError {
    /// What went wrong
    pub kind: DecodeErrorKind,
    /// Character offset of the error
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column number
    pub column: usize,
}

impl DecodeError {
    /// Build an error for the byte position `pos` in `input`
    pub fn at(kind: DecodeErrorKind, input: &str, pos: usize) -> Self {
        let before = &input[..pos.min(input.len())];
        let offset = before.chars().count();
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(nl) => before[nl + 1..].chars().count() + 1,
            None => offset + 1,
        };
        DecodeError {
            kind,
            offset,
            line,
            column,
        }
    }
}
