//! Encoder and decoder options
//!
//! Options are plain data with builder methods, deserializable so callers can
//! load them from configuration files.

use serde::{Deserialize, Serialize};

/// Default nesting limit for decoding
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// How the decoder represents numbers with a fraction or exponent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatMode {
    /// Native `f64`
    #[default]
    Float,
    /// Exact `Decimal`, no precision loss
    Decimal,
}

/// Options controlling JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Emit `NaN`, `Infinity` and `-Infinity` for non-finite floats
    pub allow_nan: bool,
    /// Sort object keys instead of keeping insertion order
    pub sort_keys: bool,
    /// Escape every non-ASCII character as `\uXXXX`
    pub ensure_ascii: bool,
}

impl EncoderOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `allow_nan`
    pub fn allow_nan(mut self, allow: bool) -> Self {
        self.allow_nan = allow;
        self
    }

    /// Set `sort_keys`
    pub fn sort_keys(mut self, sort: bool) -> Self {
        self.sort_keys = sort;
        self
    }

    /// Set `ensure_ascii`
    pub fn ensure_ascii(mut self, ascii: bool) -> Self {
        self.ensure_ascii = ascii;
        self
    }
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            allow_nan: true,
            sort_keys: false,
            ensure_ascii: false,
        }
    }
}

/// Options controlling JSON input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    /// Representation of non-integer numbers
    pub float_mode: FloatMode,
    /// Accept `NaN`, `Infinity` and `-Infinity`
    pub allow_nan: bool,
    /// Reinterpret temporal-looking strings as dates and times
    pub enrich_temporal: bool,
    /// Maximum array/object nesting
    pub max_depth: usize,
}

impl DecoderOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the float mode
    pub fn float_mode(mut self, mode: FloatMode) -> Self {
        self.float_mode = mode;
        self
    }

    /// Set `allow_nan`
    pub fn allow_nan(mut self, allow: bool) -> Self {
        self.allow_nan = allow;
        self
    }

    /// Set `enrich_temporal`
    pub fn enrich_temporal(mut self, enrich: bool) -> Self {
        self.enrich_temporal = enrich;
        self
    }

    /// Set the nesting limit
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            float_mode: FloatMode::Float,
            allow_nan: true,
            enrich_temporal: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
