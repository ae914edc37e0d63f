//! Expression buffer editing.
//!
//! Turns one [`Key`] at a time into a buffer mutation while keeping the
//! buffer syntactically repairable: no stacked operators, one point per
//! number, no more closing than opening parentheses, and numbers capped at
//! the configured digit count.

use super::buffer::{normalize, paren_balance};
use super::detection::{
    digit_count, ends_operand, is_finished_number, is_operator_char, trailing_numeric_token,
};
use super::error::ErrorKind;
use super::keys::{Key, Operator};
use crate::config::{CalculatorConfig, DEFAULT_MAX_DIGITS};

/// Display text a host may have left in the field after a failed edit.
/// It is kept as a seed, cleared by the first key, and commits zero.
pub const ERROR_SENTINEL: &str = "Error";

/// The whole mutable state of one calculator session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditorState {
    /// The in-progress expression.
    pub buffer: String,
    /// Set right after a successful `=` (or on open), so the next digit
    /// replaces the buffer instead of extending it.
    pub just_evaluated: bool,
    /// Advisory error from the last key, cleared by the next accepted edit.
    pub error: Option<ErrorKind>,
}

impl EditorState {
    /// Start from a host field value with the default digit ceiling.
    pub fn seeded(seed: &str) -> Self {
        Self::seeded_with_limit(seed, DEFAULT_MAX_DIGITS)
    }

    /// Start from a host field value. Thousands separators are stripped.
    ///
    /// Only a single number within `max_digits` (or the error sentinel) is
    /// kept; anything else starts the session empty.
    pub fn seeded_with_limit(seed: &str, max_digits: usize) -> Self {
        let cleaned: String = seed
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();

        let buffer = if cleaned == ERROR_SENTINEL {
            cleaned
        } else {
            let normalized = normalize(&cleaned);
            if is_finished_number(&normalized) && digit_count(&normalized) <= max_digits {
                normalized
            } else {
                if !normalized.is_empty() {
                    tracing::debug!(seed, "Seed is not a plain number, starting empty");
                }
                String::new()
            }
        };

        Self {
            buffer,
            just_evaluated: true,
            error: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn last_char(&self) -> Option<char> {
        self.buffer.chars().last()
    }

    fn accept(mut self) -> Self {
        self.error = None;
        self.buffer = normalize(&self.buffer);
        self
    }

    fn reject(mut self, error: ErrorKind) -> Self {
        tracing::debug!(buffer = %self.buffer, %error, "Key rejected");
        self.error = Some(error);
        self
    }
}

/// Apply every key except `=` to the state.
///
/// `=` needs the evaluator and is handled by the session controller; passing
/// it here returns the state untouched.
/// Out-of-range digits leave the buffer alone and raise
/// [`ErrorKind::UnknownInput`].
pub fn apply_key(mut state: EditorState, key: Key, config: &CalculatorConfig) -> EditorState {
    if let Key::Digit(d) = key
        && d > 9
    {
        return state.reject(ErrorKind::UnknownInput);
    }

    if state.buffer == ERROR_SENTINEL && key != Key::Equals {
        state.buffer.clear();
    }

    match key {
        Key::Digit(d) => push_digit(state, char::from(b'0' + d), config),
        Key::Point => push_point(state),
        Key::Operator(op) => push_operator(state, op),
        Key::OpenParen => push_open_paren(state),
        Key::CloseParen => push_close_paren(state),
        Key::Clear => EditorState::default(),
        Key::Delete => delete_last(state),
        Key::Equals => state,
    }
}

fn push_digit(mut state: EditorState, digit: char, config: &CalculatorConfig) -> EditorState {
    if state.just_evaluated {
        state.buffer = digit.to_string();
        state.just_evaluated = false;
        return state.accept();
    }

    if digit_count(trailing_numeric_token(&state.buffer)) >= config.max_digits {
        return state.reject(ErrorKind::DigitLimitExceeded);
    }

    state.buffer.push(digit);
    state.accept()
}

fn push_point(mut state: EditorState) -> EditorState {
    if state.just_evaluated {
        state.buffer = "0.".to_string();
        state.just_evaluated = false;
        return state.accept();
    }

    if trailing_numeric_token(&state.buffer).contains('.') {
        return state;
    }

    state.buffer.push('.');
    state.accept()
}

fn push_operator(mut state: EditorState, op: Operator) -> EditorState {
    state.just_evaluated = false;

    // Only the most recent operator is kept
    if state.last_char().is_some_and(is_operator_char) {
        state.buffer.pop();
    }

    state.buffer.push(op.symbol());
    state.accept()
}

fn push_open_paren(mut state: EditorState) -> EditorState {
    if state.last_char().is_some_and(ends_operand) {
        state.buffer.push('*');
    }

    state.buffer.push('(');
    state.just_evaluated = false;
    state.accept()
}

fn push_close_paren(mut state: EditorState) -> EditorState {
    let (open, close) = paren_balance(&state.buffer);
    if open <= close {
        return state.reject(ErrorKind::UnbalancedParens);
    }

    state.buffer.push(')');
    state.just_evaluated = false;
    state.accept()
}

fn delete_last(mut state: EditorState) -> EditorState {
    state.buffer.pop();
    state.just_evaluated = false;
    state.accept()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CalculatorConfig {
        CalculatorConfig::default()
    }

    fn editing(buffer: &str) -> EditorState {
        EditorState {
            buffer: buffer.to_string(),
            ..EditorState::default()
        }
    }

    fn press_all(mut state: EditorState, labels: &str) -> EditorState {
        for label in labels.split_whitespace() {
            let key = Key::parse(label).unwrap();
            state = apply_key(state, key, &config());
        }
        state
    }

    #[test]
    fn test_seed_is_cleaned() {
        let state = EditorState::seeded("1,250");
        assert_eq!(state.buffer, "1250");
        assert!(state.just_evaluated);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_seed_that_is_not_a_number_starts_empty() {
        assert_eq!(EditorState::seeded("5)").buffer, "");
        assert_eq!(EditorState::seeded("1+2").buffer, "");
        assert_eq!(EditorState::seeded("abc").buffer, "");
        assert_eq!(EditorState::seeded("123456789012345678").buffer, "");
        assert_eq!(EditorState::seeded_with_limit("12345", 4).buffer, "");
        assert_eq!(EditorState::seeded("-12.5").buffer, "-12.5");
        assert_eq!(EditorState::seeded("0050").buffer, "50");

        let state = apply_key(EditorState::seeded("5)"), Key::Operator(Operator::Add), &config());
        assert_eq!(state.buffer, "+");
    }

    #[test]
    fn test_sentinel_seed_cleared_by_first_key() {
        let state = EditorState::seeded(ERROR_SENTINEL);
        assert_eq!(state.buffer, ERROR_SENTINEL);

        let state = apply_key(state, Key::Operator(Operator::Subtract), &config());
        assert_eq!(state.buffer, "-");

        let state = apply_key(EditorState::seeded(ERROR_SENTINEL), Key::Delete, &config());
        assert_eq!(state.buffer, "");
    }

    #[test]
    fn test_out_of_range_digit_rejected() {
        let state = apply_key(editing("1"), Key::Digit(42), &config());
        assert_eq!(state.buffer, "1");
        assert_eq!(state.error, Some(ErrorKind::UnknownInput));

        let state = apply_key(EditorState::seeded("250"), Key::Digit(10), &config());
        assert_eq!(state.buffer, "250");
        assert!(state.just_evaluated);
        assert_eq!(state.error, Some(ErrorKind::UnknownInput));
    }

    #[test]
    fn test_digit_replaces_seed() {
        let state = apply_key(EditorState::seeded("250"), Key::Digit(7), &config());
        assert_eq!(state.buffer, "7");
        assert!(!state.just_evaluated);
    }

    #[test]
    fn test_point_replaces_seed() {
        let state = apply_key(EditorState::seeded("250"), Key::Point, &config());
        assert_eq!(state.buffer, "0.");
    }

    #[test]
    fn test_operator_extends_seed() {
        let state = press_all(EditorState::seeded("250"), "+ 5");
        assert_eq!(state.buffer, "250+5");
    }

    #[test]
    fn test_operator_replaces_operator() {
        let state = apply_key(editing("5+"), Key::Operator(Operator::Multiply), &config());
        assert_eq!(state.buffer, "5*");
    }

    #[test]
    fn test_implicit_multiplication() {
        let state = apply_key(editing("3"), Key::OpenParen, &config());
        assert_eq!(state.buffer, "3*(");

        let state = apply_key(editing("(1+2)"), Key::OpenParen, &config());
        assert_eq!(state.buffer, "(1+2)*(");

        let state = apply_key(editing("3+"), Key::OpenParen, &config());
        assert_eq!(state.buffer, "3+(");

        let state = apply_key(editing(""), Key::OpenParen, &config());
        assert_eq!(state.buffer, "(");
    }

    #[test]
    fn test_close_paren_requires_open() {
        let state = apply_key(editing("3"), Key::CloseParen, &config());
        assert_eq!(state.buffer, "3");
        assert_eq!(state.error, Some(ErrorKind::UnbalancedParens));

        let state = press_all(editing("(3"), ") )");
        assert_eq!(state.buffer, "(3)");
        assert_eq!(state.error, Some(ErrorKind::UnbalancedParens));
    }

    #[test]
    fn test_leading_zeros_stripped_while_typing() {
        let state = press_all(EditorState::default(), "0 0 5");
        assert_eq!(state.buffer, "5");

        let state = press_all(EditorState::default(), "0 . 0 5");
        assert_eq!(state.buffer, "0.05");
    }

    #[test]
    fn test_point_after_operator_gets_zero() {
        let state = press_all(editing("5+"), ". 5");
        assert_eq!(state.buffer, "5+0.5");
    }

    #[test]
    fn test_duplicate_point_ignored() {
        let before = editing("1.5");
        let after = apply_key(before.clone(), Key::Point, &config());
        assert_eq!(after, before);
    }

    #[test]
    fn test_point_allowed_in_next_number() {
        let state = press_all(editing("1.5+2"), ". 5");
        assert_eq!(state.buffer, "1.5+2.5");
    }

    #[test]
    fn test_digit_limit() {
        let full = "12345678901234";
        let state = apply_key(editing(full), Key::Digit(5), &config());
        assert_eq!(state.buffer, full);
        assert_eq!(state.error, Some(ErrorKind::DigitLimitExceeded));

        // A point is still allowed, digits after it are not
        let state = apply_key(editing(full), Key::Point, &config());
        assert_eq!(state.buffer, "12345678901234.");
        assert_eq!(state.error, None);
        let state = apply_key(state, Key::Digit(1), &config());
        assert_eq!(state.error, Some(ErrorKind::DigitLimitExceeded));

        // The limit is per number
        let state = press_all(editing(full), "+ 1");
        assert_eq!(state.buffer, "12345678901234+1");
    }

    #[test]
    fn test_custom_digit_limit() {
        let config = CalculatorConfig {
            max_digits: 3,
            ..CalculatorConfig::default()
        };
        let state = apply_key(editing("999"), Key::Digit(9), &config);
        assert_eq!(state.error, Some(ErrorKind::DigitLimitExceeded));
    }

    #[test]
    fn test_clear() {
        let mut state = editing("12+3");
        state.error = Some(ErrorKind::DivisionByZero);
        state.just_evaluated = true;
        assert_eq!(apply_key(state, Key::Clear, &config()), EditorState::default());
    }

    #[test]
    fn test_delete_clears_error() {
        let state = apply_key(editing("12345678901234"), Key::Digit(1), &config());
        assert_eq!(state.error, Some(ErrorKind::DigitLimitExceeded));

        let state = apply_key(state, Key::Delete, &config());
        assert_eq!(state.buffer, "1234567890123");
        assert_eq!(state.error, None);

        let state = apply_key(editing(""), Key::Delete, &config());
        assert_eq!(state.buffer, "");
    }

    #[test]
    fn test_accepted_key_clears_error() {
        let mut state = editing("1");
        state.error = Some(ErrorKind::UnknownInput);
        let state = apply_key(state, Key::Digit(2), &config());
        assert_eq!(state.error, None);
        assert_eq!(state.buffer, "12");
    }

    #[test]
    fn test_equals_is_ignored_by_editor() {
        let state = editing("1+1");
        assert_eq!(apply_key(state.clone(), Key::Equals, &config()), state);
    }
}
