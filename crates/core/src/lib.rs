//! Core types for jsonform
//!
//! This crate defines the value tree shared by the codec and the form layer.
//! Besides the JSON-native variants it carries typed leaves that plain JSON
//! cannot represent: dates, wall-clock times, timestamps and exact decimals.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod temporal;
pub mod value;

pub use temporal::{TimeOfDay, Timestamp};
pub use value::{Map, Value};

// Re-export the leaf libraries so callers build values with matching versions
pub use chrono;
pub use rust_decimal::Decimal;
