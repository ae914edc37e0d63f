//! Render-ready snapshot of a calculator session.

use serde::Serialize;

use super::session::Session;

/// What a host shows for an open calculator.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalculatorDisplay {
    /// The expression as typed.
    pub expression: String,
    /// Live result, absent while the expression is incomplete.
    pub preview: Option<String>,
    /// Inline error text, if the last key was rejected.
    pub error: Option<String>,
    /// Whether `error` is set.
    pub is_error: bool,
}

impl CalculatorDisplay {
    /// Snapshot a session.
    pub fn from_session(session: &Session) -> Self {
        let error = session
            .error()
            .filter(|kind| !kind.is_silent())
            .map(|kind| kind.to_string());

        Self {
            expression: session.buffer().to_string(),
            preview: session.preview(),
            is_error: error.is_some(),
            error,
        }
    }

    /// The main display line: the expression, or `0` when nothing is typed.
    pub fn display_line(&self) -> &str {
        if self.expression.is_empty() {
            "0"
        } else {
            &self.expression
        }
    }

    /// The secondary line under the display.
    /// Errors take precedence over the preview.
    pub fn hint_line(&self) -> Option<String> {
        match (&self.error, &self.preview) {
            (Some(error), _) => Some(error.clone()),
            (None, Some(preview)) => Some(format!("= {preview}")),
            (None, None) => None,
        }
    }
}
