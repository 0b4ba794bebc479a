//! Literal evaluation errors
//!
//! Messages follow the wording users of the literal syntax already know
//! (`name 'x' is not defined`, `month must be in 1..12`), since they are
//! shown verbatim as validation errors.

use thiserror::Error;

use super::lexer::Span;

/// Failure to parse or evaluate literal input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Input does not follow the literal grammar
    #[error("{message} (line {line}, column {column})")]
    Syntax {
        /// What went wrong
        message: String,
        /// 1-based line
        line: u32,
        /// 1-based column
        column: u32,
    },

    /// A bare name other than the known constants and `datetime`
    #[error("name '{0}' is not defined")]
    UndefinedName(String),

    /// Attribute lookup failed
    #[error("{0}")]
    Attribute(String),

    /// Call on something that is not a constructor
    #[error("'{0}' object is not callable")]
    NotCallable(&'static str),

    /// Wrong number, name or type of arguments
    #[error("{0}")]
    Type(String),

    /// Argument value outside the accepted range
    #[error("{0}")]
    Range(String),

    /// Evaluated to something JSON cannot hold
    #[error("Object of type {0} is not JSON serializable")]
    NotSerializable(&'static str),
}

impl EvalError {
    /// Syntax error at a source location
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        EvalError::Syntax {
            message: message.into(),
            line: span.line,
            column: span.column,
        }
    }

    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        EvalError::Type(message.into())
    }

    pub(crate) fn range(message: impl Into<String>) -> Self {
        EvalError::Range(message.into())
    }

    /// Whether the input failed to parse, as opposed to failing to evaluate
    pub fn is_syntax(&self) -> bool {
        matches!(self, EvalError::Syntax { .. })
    }
}
