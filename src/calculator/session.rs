//! Live preview and commit control for one calculator session.
//!
//! Bridges the editor and the evaluator. Previews never touch the buffer;
//! only `=` and confirm replace it with an evaluated number, and only
//! confirm hands a value to the host.

use serde::Serialize;

use super::detection::is_finished_number;
use super::editor::{ERROR_SENTINEL, EditorState, apply_key};
use super::error::ErrorKind;
use super::evaluation::{canonical_string, evaluate_with_limit, format_display};
use super::keys::{Key, TapClassifier};
use crate::config::CalculatorConfig;

/// The value handed to the host form when a session is confirmed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommitPayload {
    /// Dot-delimited location of the target field, e.g. `reimbursable.me.meal.2.amount`.
    pub path: String,
    pub value: f64,
}

/// Preview text for the current buffer, if it evaluates cleanly.
///
/// Never mutates anything; every evaluation error just means no preview.
pub fn preview(state: &EditorState, config: &CalculatorConfig) -> Option<String> {
    if state.buffer.trim().is_empty() {
        return None;
    }

    evaluate_with_limit(&state.buffer, config.max_digits)
        .ok()
        .map(|value| format_display(value, config.thousands_separator))
}

/// Handle one key, routing `=` to the evaluator and everything else to the editor.
pub fn handle_key(state: EditorState, key: Key, config: &CalculatorConfig) -> EditorState {
    tracing::debug!(%key, buffer = %state.buffer, "Key pressed");
    match key {
        Key::Equals => evaluate_and_commit_to_buffer(state, config),
        other => apply_key(state, other, config),
    }
}

/// The `=` key: replace the buffer with its value.
///
/// On failure the buffer is left as typed and the error is recorded.
/// Evaluating an empty buffer does nothing.
pub fn evaluate_and_commit_to_buffer(
    mut state: EditorState,
    config: &CalculatorConfig,
) -> EditorState {
    match evaluate_with_limit(&state.buffer, config.max_digits) {
        Ok(value) => {
            state.buffer = canonical_string(value);
            state.just_evaluated = true;
            state.error = None;
            tracing::debug!(result = %state.buffer, "Expression evaluated");
        }
        Err(ErrorKind::EmptyExpression) => {
            state.error = None;
        }
        Err(error) => {
            tracing::debug!(buffer = %state.buffer, %error, "Evaluation failed");
            state.error = Some(error);
        }
    }
    state
}

/// Evaluate, then turn the buffer into a commit payload for `path`.
///
/// Returns the state alongside the outcome so the caller can keep showing
/// the error and let the user fix the expression.
pub fn confirm(
    mut state: EditorState,
    path: &str,
    config: &CalculatorConfig,
) -> (EditorState, Result<CommitPayload, ErrorKind>) {
    if state.buffer == ERROR_SENTINEL {
        state.buffer.clear();
    }

    let mut state = evaluate_and_commit_to_buffer(state, config);
    if let Some(error) = state.error {
        return (state, Err(error));
    }

    let value = if state.buffer.is_empty() {
        0.0
    } else if is_finished_number(&state.buffer) {
        match state.buffer.parse::<f64>() {
            Ok(value) => value,
            Err(_) => {
                state.error = Some(ErrorKind::IncompleteExpression);
                return (state, Err(ErrorKind::IncompleteExpression));
            }
        }
    } else {
        state.error = Some(ErrorKind::IncompleteExpression);
        return (state, Err(ErrorKind::IncompleteExpression));
    };

    let payload = CommitPayload {
        path: path.to_string(),
        value,
    };
    tracing::info!(path = %payload.path, value = payload.value, "Calculator value committed");
    (state, Ok(payload))
}

/// Discard a session without emitting anything.
pub fn cancel(state: EditorState) {
    tracing::debug!(buffer = %state.buffer, "Calculator cancelled");
}

/// Open a session on a host field.
pub fn open(seed: &str, target_path: &str, config: CalculatorConfig) -> Session {
    Session::open(seed, target_path, config)
}

/// One open calculator, bound to a target field.
#[derive(Clone, Debug)]
pub struct Session {
    state: EditorState,
    target_path: String,
    config: CalculatorConfig,
    closed: bool,
}

impl Session {
    /// Start editing `seed` (the field's current value, separators allowed).
    pub fn open(seed: &str, target_path: &str, config: CalculatorConfig) -> Self {
        tracing::debug!(seed, target_path, "Calculator opened");
        Self {
            state: EditorState::seeded_with_limit(seed, config.max_digits),
            target_path: target_path.to_string(),
            config,
            closed: false,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn buffer(&self) -> &str {
        &self.state.buffer
    }

    pub fn error(&self) -> Option<ErrorKind> {
        self.state.error
    }

    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// A tap classifier for touch keypads, using the configured threshold.
    pub fn tap_classifier(&self) -> TapClassifier {
        TapClassifier::new(self.config.touch_threshold)
    }

    pub fn handle_key(&mut self, key: Key) {
        if self.closed {
            return;
        }
        let state = std::mem::take(&mut self.state);
        self.state = handle_key(state, key, &self.config);
    }

    /// Handle a raw key name from the keyboard adapter.
    ///
    /// Names the adapter does not know leave the buffer alone and raise
    /// [`ErrorKind::UnknownInput`] until the next accepted key.
    pub fn handle_input(&mut self, name: &str) {
        if self.closed {
            return;
        }
        match Key::from_keyboard(name) {
            Some(key) => self.handle_key(key),
            None => {
                tracing::debug!(name, "Unknown key");
                self.state.error = Some(ErrorKind::UnknownInput);
            }
        }
    }

    pub fn preview(&self) -> Option<String> {
        preview(&self.state, &self.config)
    }

    /// Finish the session. On success the session closes.
    pub fn confirm(&mut self) -> Result<CommitPayload, ErrorKind> {
        if self.closed {
            return Err(ErrorKind::IncompleteExpression);
        }
        let state = std::mem::take(&mut self.state);
        let (state, outcome) = confirm(state, &self.target_path, &self.config);
        self.state = state;
        self.closed = outcome.is_ok();
        outcome
    }

    pub fn cancel(self) {
        cancel(self.state);
    }
}
