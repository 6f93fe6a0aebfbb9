//! Calculator core: input accumulation, evaluation and history
//!
//! Everything in here is presentation-free. The [`crate::calculator`]
//! façade wires these pieces to a key-value store and an event queue.

pub mod evaluator;
pub mod history;
pub mod input;
mod operator;
pub mod parser;

pub use operator::Operator;

use thiserror::Error;

/// Result type for calculator operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Display string shown in place of a result after a failed evaluation
pub const DEFAULT_ERROR_SENTINEL: &str = "Error";

/// Number of decimal places a non-integer result is rounded to
pub const DEFAULT_DECIMAL_PLACES: usize = 10;

/// Calculator error types
///
/// Evaluation has exactly one failure mode. The message carries the reason
/// for logs; the user only ever sees the sentinel and a hint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Expression could not be evaluated: empty after sanitization, bad
    /// syntax, unbalanced parentheses, division by zero or non-finite result
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),
}

impl CalcError {
    /// Creates a malformed expression error
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedExpression(reason.into())
    }

    /// Returns the underlying reason
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::MalformedExpression(reason) => reason,
        }
    }
}
