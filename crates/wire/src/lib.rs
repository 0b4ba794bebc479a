//! Wire encoding for jsonform
//!
//! This crate turns value trees into JSON text and back. Plain JSON has no
//! dates, times or exact decimals, so the codec extends it by convention:
//!
//! | Value Type | JSON Encoding |
//! |------------|--------------|
//! | Null | `null` |
//! | Bool | `true`/`false` |
//! | Int | number |
//! | Float | number, or `NaN`/`Infinity` when allowed |
//! | Decimal | `"3.140"` |
//! | String | `"..."` |
//! | Date | `"2021-01-01"` |
//! | Time | `"10:30:00.123"` (naive only) |
//! | DateTime | `"2021-01-01T10:30:00.123+05:30"`, UTC as `Z` |
//! | Bytes | not encodable |
//! | Array | `[...]` |
//! | Object | `{...}` |
//!
//! On the way back, every string in the tree that matches the time, date or
//! timestamp pattern is reinterpreted as that type.
//!
//! ## Examples
//!
//! ```
//! use jsonform_wire::{decode_json, encode_json, Value};
//! use jsonform_wire::chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
//! let json = encode_json(&Value::Date(date)).unwrap();
//! assert_eq!(json, r#""2021-01-01""#);
//!
//! let decoded = decode_json(&json).unwrap();
//! assert_eq!(decoded, Value::Date(date));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod json;
pub mod literal;

pub use jsonform_core::{chrono, Decimal, Map, TimeOfDay, Timestamp, Value};

// Re-export main types
pub use json::{
    decode_json, encode_json, CodecError, DecodeError, DecodeErrorKind, DecoderOptions,
    EncodeError, EncoderOptions, FloatMode, JsonCodec, JsonDecoder, JsonEncoder,
};
pub use literal::{evaluate, evaluate_to_json, EvalError, LiteralError};
