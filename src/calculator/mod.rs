//! Calculator module for entering amounts as arithmetic expressions.
//!
//! This module provides functionality to:
//! - Map keypad taps and keyboard keys to calculator keys
//! - Edit an expression buffer one key at a time
//! - Evaluate expressions safely and format results
//! - Preview results live and commit the final value to the host form

mod buffer;
mod detection;
mod display;
mod editor;
mod error;
mod evaluation;
mod keys;
mod session;

pub use buffer::{normalize, paren_balance};
pub use detection::{has_only_allowed_chars, is_finished_number};
pub use display::CalculatorDisplay;
pub use editor::{ERROR_SENTINEL, EditorState, apply_key};
pub use error::ErrorKind;
pub use evaluation::{
    EvaluationResult, canonical_string, evaluate, evaluate_with_limit, format_display,
    format_with_separators,
};
pub use keys::{KEYPAD, KEYPAD_COLUMNS, Key, Operator, TapClassifier};
pub use session::{
    CommitPayload, Session, cancel, confirm, evaluate_and_commit_to_buffer,
    handle_key, open, preview,
};
