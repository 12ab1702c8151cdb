//! Error type shared by the normalizer, the evaluator and the checked operations.

use thiserror::Error;

/// A recoverable calculation failure.
///
/// None of these are fatal to a session: callers print the message and
/// return to the prompt (menu) or reset the display (keypad).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// The input could not be tokenized or parsed, or used a name outside the
    /// allowed set. `text` is the offending fragment, for display.
    #[error("Invalid expression '{text}': {reason}")]
    InvalidExpression { text: String, reason: String },

    /// An argument is outside the domain of the function applied to it.
    #[error("Math domain error: {0}")]
    DomainError(String),

    #[error("Division by zero is not allowed")]
    DivisionByZero,

    /// The result does not fit in a finite `f64`.
    #[error("Overflow: {0}")]
    Overflow(String),
}

impl CalcError {
    pub(crate) fn invalid(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidExpression {
            text: text.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn domain(message: impl Into<String>) -> Self {
        Self::DomainError(message.into())
    }

    pub(crate) fn overflow(message: impl Into<String>) -> Self {
        Self::Overflow(message.into())
    }
}
