//! Literal input mode
//!
//! Accepts a small expression language in place of strict JSON: single or
//! double quoted strings, `None`/`True`/`False` next to `null`/`true`/`false`,
//! tuples, trailing commas, and constructors from the `datetime` namespace.
//!
//! ```
//! use jsonform_wire::literal::evaluate;
//! use jsonform_wire::Value;
//!
//! let value = evaluate("{'when': datetime.date(2021, 1, 1), 'tags': ('a', 'b',)}").unwrap();
//! assert!(matches!(value.get("when"), Some(Value::Date(_))));
//! ```
//!
//! Input is parsed and evaluated by a fixed grammar; nothing is executed.
//! The result is handed to the JSON encoder like any other value tree.

mod error;
mod eval;
mod lexer;
mod parser;

pub use error::EvalError;
pub use lexer::{Lexer, Span, Token, TokenKind};
pub use parser::{parse, Expr, Parser, MAX_NESTING};

use jsonform_core::Value;

use crate::json::JsonEncoder;

/// Parse and evaluate literal input
pub fn evaluate(source: &str) -> Result<Value, EvalError> {
    let expr = parse(source)?;
    eval::eval(&expr)
}

/// Evaluate an already parsed expression
pub fn evaluate_expr(expr: &Expr) -> Result<Value, EvalError> {
    eval::eval(expr)
}

/// Errors from [`evaluate_to_json`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LiteralError {
    /// Parsing or evaluation failed
    #[error(transparent)]
    Eval(#[from] EvalError),
    /// The evaluated tree could not be encoded
    #[error(transparent)]
    Encode(#[from] crate::json::EncodeError),
}

/// Evaluate literal input and encode the result as JSON text
pub fn evaluate_to_json(source: &str, encoder: &JsonEncoder) -> Result<String, LiteralError> {
    let value = evaluate(source)?;
    Ok(encoder.encode(&value)?)
}
