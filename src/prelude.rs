//! Convenient imports for jsonform.
//!
//! ```
//! use jsonform::prelude::*;
//!
//! let field = JsonField::with_options(FieldOptions::new().required(false));
//! assert_eq!(field.clean(None)?, None);
//! # Ok::<(), Error>(())
//! ```

// Field
pub use crate::field::JsonField;
pub use crate::options::FieldOptions;

// Error handling
pub use crate::error::{Error, Result};

// Core types
pub use jsonform_wire::{Map, TimeOfDay, Timestamp, Value};

// Codec
pub use jsonform_wire::{DecoderOptions, EncoderOptions, FloatMode, JsonCodec};
