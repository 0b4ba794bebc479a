//! JSON codec for jsonform values
//!
//! Encoding turns typed leaves into strings:
//!
//! | Value | JSON |
//! |-------|------|
//! | DateTime | `"2021-01-01T10:30:00.123+05:30"`, `+00:00` written as `Z` |
//! | Date | `"2021-01-01"` |
//! | Time (naive) | `"10:30:00.123"` |
//! | Time (aware) | error |
//! | Decimal | `"3.140"` |
//! | Bytes | error |
//!
//! Decoding reverses the temporal conversions by pattern matching on every
//! string in the tree. Decimals are not reconstructed: a decoded `"3.140"`
//! stays a string.

mod decode;
mod encode;
mod error;
mod options;
mod temporal;

pub use decode::{decode_json, enrich, JsonDecoder};
pub use encode::{
    encode_date, encode_datetime, encode_decimal, encode_json, encode_leaf, encode_string,
    encode_time, JsonEncoder,
};
pub use error::{DecodeError, DecodeErrorKind, EncodeError};
pub use options::{DecoderOptions, EncoderOptions, FloatMode, DEFAULT_MAX_DEPTH};
pub use temporal::{match_date, match_datetime, match_time, parse_temporal, Matcher, MATCHERS};

use jsonform_core::Value;
use thiserror::Error;

/// Failure of either half of an encode-then-decode pass
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    /// Encoding failed
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Decoding failed
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// An encoder and decoder configured together
///
/// Callers hold a codec and pass it where JSON is produced or consumed;
/// nothing is registered globally.
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    encoder: JsonEncoder,
    decoder: JsonDecoder,
}

impl JsonCodec {
    /// Pair an encoder with a decoder
    pub fn new(encoder: JsonEncoder, decoder: JsonDecoder) -> Self {
        Self { encoder, decoder }
    }

    /// Build a codec from options
    pub fn with_options(encoder: EncoderOptions, decoder: DecoderOptions) -> Self {
        Self::new(
            JsonEncoder::with_options(encoder),
            JsonDecoder::with_options(decoder),
        )
    }

    /// The encoder half
    pub fn encoder(&self) -> &JsonEncoder {
        &self.encoder
    }

    /// The decoder half
    pub fn decoder(&self) -> &JsonDecoder {
        &self.decoder
    }

    /// Encode a value tree
    pub fn encode(&self, value: &Value) -> Result<String, EncodeError> {
        self.encoder.encode(value)
    }

    /// Decode JSON text
    pub fn decode(&self, json: &str) -> Result<Value, DecodeError> {
        self.decoder.decode(json)
    }

    /// Encode a value and decode the result
    ///
    /// Normalizes a tree the way storage would: temporal leaves lose
    /// sub-millisecond precision and decimals become strings.
    pub fn round_trip(&self, value: &Value) -> Result<Value, CodecError> {
        let json = self.encode(value)?;
        Ok(self.decode(&json)?)
    }
}
