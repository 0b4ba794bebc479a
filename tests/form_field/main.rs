//! Form Field Test Suite
//!
//! End-to-end tests for `JsonField`: text in, value tree out, and back.
//!
//! ## Key Verification Points
//!
//! 1. Temporal strings are recognized after decoding; everything else is kept
//! 2. Syntax errors surface with their position
//! 3. Literal mode reaches the same codec as strict JSON
//! 4. Options loaded from TOML behave like options built in code
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test form_field
//!
//! # Literal mode only
//! cargo test --test form_field literal::
//! ```

use jsonform::chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use jsonform::prelude::*;

// Test modules
pub mod clean;
pub mod config;
pub mod literal;
pub mod properties;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// A required strict-JSON field
pub fn strict_field() -> JsonField {
    JsonField::new()
}

/// A required field accepting literal syntax
pub fn literal_field() -> JsonField {
    JsonField::with_options(FieldOptions::new().evaluate(true))
}

/// Clean non-empty input, unwrapping the `Some`
pub fn clean_ok(field: &JsonField, input: &str) -> Value {
    field
        .clean(Some(input))
        .unwrap_or_else(|e| panic!("clean({:?}) failed: {}", input, e))
        .expect("non-empty input yields a value")
}

/// Clean input expected to fail, returning the message
pub fn clean_err(field: &JsonField, input: &str) -> String {
    match field.clean(Some(input)) {
        Ok(v) => panic!("clean({:?}) unexpectedly succeeded: {:?}", input, v),
        Err(e) => e.message(),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> Value {
    Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

pub fn time(h: u32, m: u32, s: u32) -> Value {
    Value::Time(TimeOfDay::naive(NaiveTime::from_hms_opt(h, m, s).unwrap()))
}

pub fn naive_datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

pub fn offset(seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds).unwrap()
}
