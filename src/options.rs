//! Field configuration.
//!
//! Options can be built in code or loaded from TOML:
//!
//! ```
//! use jsonform::FieldOptions;
//!
//! let options = FieldOptions::from_toml_str(
//!     r#"
//!     required = false
//!     evaluate = true
//!
//!     [encoder]
//!     sort_keys = true
//!     "#,
//! )
//! .unwrap();
//! assert!(!options.required);
//! assert!(options.encoder.sort_keys);
//! ```

use jsonform_wire::{DecoderOptions, EncoderOptions, FloatMode, JsonCodec};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options for a [`JsonField`](crate::JsonField).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    /// Reject empty input
    pub required: bool,
    /// Accept literal syntax instead of strict JSON
    pub evaluate: bool,
    /// Encoder settings used in literal mode and for redisplay
    pub encoder: EncoderOptions,
    /// Decoder settings
    pub decoder: DecoderOptions,
}

impl FieldOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Set whether empty input is rejected.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set whether literal syntax is accepted.
    pub fn evaluate(mut self, evaluate: bool) -> Self {
        self.evaluate = evaluate;
        self
    }

    /// Replace the encoder settings.
    pub fn encoder(mut self, encoder: EncoderOptions) -> Self {
        self.encoder = encoder;
        self
    }

    /// Replace the decoder settings.
    pub fn decoder(mut self, decoder: DecoderOptions) -> Self {
        self.decoder = decoder;
        self
    }

    /// Build the codec these options describe.
    pub fn codec(&self) -> JsonCodec {
        JsonCodec::with_options(self.encoder.clone(), self.decoder.clone())
    }
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            required: true,
            evaluate: false,
            encoder: EncoderOptions::default(),
            decoder: DecoderOptions::default().float_mode(FloatMode::Decimal),
        }
    }
}
