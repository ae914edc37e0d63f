//! Error taxonomy for the calculator.
//!
//! Every error is local and recoverable. The `Display` text is the short
//! inline message shown under the calculator display.

use serde::Serialize;
use thiserror::Error;

/// A recoverable calculator error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Error)]
pub enum ErrorKind {
    /// Nothing to evaluate. Hosts treat this as a no-op.
    #[error("Nothing to calculate")]
    EmptyExpression,
    /// The expression contains characters outside the arithmetic alphabet.
    #[error("Invalid characters")]
    InvalidCharacters,
    /// Malformed operator or number sequence.
    #[error("Invalid expression")]
    InvalidExpression,
    /// More closing than opening parentheses, or unclosed groups.
    #[error("Unbalanced parentheses")]
    UnbalancedParens,
    #[error("Cannot divide by zero")]
    DivisionByZero,
    /// The result is not a finite number.
    #[error("Result overflow")]
    Overflow,
    /// The result has more significant digits than the display allows.
    #[error("Result too large")]
    ResultTooLarge,
    /// The number being typed is already at the digit ceiling.
    #[error("Digit limit reached")]
    DigitLimitExceeded,
    /// Confirm was pressed while the display does not hold a single number.
    #[error("Enter a complete expression first")]
    IncompleteExpression,
    /// The input channel produced a key the calculator does not know.
    #[error("Unknown key")]
    UnknownInput,
}

impl ErrorKind {
    /// Whether this error should stay hidden from the user.
    ///
    /// Evaluating an empty display is a no-op, not a mistake.
    pub fn is_silent(self) -> bool {
        matches!(self, Self::EmptyExpression)
    }
}
