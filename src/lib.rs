//! # jsonform
//!
//! JSON form fields with dates, times and exact decimals.
//!
//! Plain JSON has no temporal or decimal types. jsonform encodes them as
//! canonical strings and, when reading, recognizes those strings again:
//!
//! ```
//! use jsonform::prelude::*;
//!
//! let field = JsonField::new();
//! let value = field
//!     .clean(Some(r#"{"at": "2021-06-30T12:00:00Z", "price": 9.90}"#))?
//!     .expect("required field");
//!
//! assert!(matches!(value.get("at"), Some(Value::DateTime(_))));
//! assert!(matches!(value.get("price"), Some(Value::Decimal(_))));
//! assert_eq!(
//!     field.prepare_value(&value)?,
//!     r#"{"at":"2021-06-30T12:00:00Z","price":"9.90"}"#
//! );
//! # Ok::<(), jsonform::Error>(())
//! ```
//!
//! ## Literal mode
//!
//! With [`FieldOptions::evaluate`] set, the field also accepts a restricted
//! literal syntax: single-quoted strings, `None`/`True`/`False`, tuples and
//! constructors such as `datetime.date(2021, 1, 1)`. See
//! [`jsonform_wire::literal`].
//!
//! ## Crates
//!
//! - `jsonform-core`: the [`Value`] tree and temporal types
//! - `jsonform-wire`: the JSON codec and literal evaluator
//! - `jsonform`: the form field, options and errors

#![warn(missing_docs)]

mod error;
mod field;
mod options;

pub mod prelude;

// Re-export main entry points
pub use error::{Error, Result};
pub use field::JsonField;
pub use options::FieldOptions;

// Re-export codec types
pub use jsonform_wire::{
    chrono, Decimal, DecodeError, DecoderOptions, EncodeError, EncoderOptions, EvalError,
    FloatMode, JsonCodec, JsonDecoder, JsonEncoder, Map, TimeOfDay, Timestamp, Value,
};
