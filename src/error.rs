//! Validation errors for form fields.
//!
//! Every failure a field can produce surfaces as one [`Error`] whose
//! `Display` text is the message shown to the user. Codec and literal errors
//! are carried unchanged so their wording and positions survive.

use jsonform_wire::{CodecError, DecodeError, EncodeError, EvalError, LiteralError};
use thiserror::Error;

/// All jsonform errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Empty input on a required field
    #[error("This field is required.")]
    Required,

    /// Input is not valid JSON
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A value could not be rendered as JSON
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Literal input failed to parse or evaluate
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// Field options could not be loaded
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for jsonform operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The human-readable validation message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if the field was left empty.
    pub fn is_required(&self) -> bool {
        matches!(self, Error::Required)
    }

    /// Check if the input itself was malformed, JSON or literal.
    pub fn is_syntax(&self) -> bool {
        match self {
            Error::Decode(_) => true,
            Error::Eval(e) => e.is_syntax(),
            _ => false,
        }
    }
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Encode(e) => Error::Encode(e),
            CodecError::Decode(e) => Error::Decode(e),
        }
    }
}

impl From<LiteralError> for Error {
    fn from(e: LiteralError) -> Self {
        match e {
            LiteralError::Eval(e) => Error::Eval(e),
            LiteralError::Encode(e) => Error::Encode(e),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
