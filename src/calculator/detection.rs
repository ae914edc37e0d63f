//! Grammar predicates for calculator input.
//!
//! Cheap regex checks shared by the editor, the evaluator, and the commit
//! controller. None of these evaluate anything.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches strings containing only arithmetic characters.
    /// Allows: digits, whitespace, the four operators, parentheses, dots.
    static ref ALLOWED_CHARS: Regex = Regex::new(
        r"^[0-9+\-*/().\s]+$"
    ).unwrap();

    /// Matches a single finished number, optionally negative.
    static ref FINISHED_NUMBER: Regex = Regex::new(
        r"^-?\d+(\.\d+)?$"
    ).unwrap();

    /// Matches the numeric run at the end of a buffer (may be empty).
    static ref TRAILING_NUMBER: Regex = Regex::new(
        r"[0-9.]*$"
    ).unwrap();
}

/// Check that every character belongs to the arithmetic alphabet.
///
/// This is the first line of defence before parsing: identifiers, function
/// calls, and exponent notation (`1e3`) never get past it.
pub fn has_only_allowed_chars(input: &str) -> bool {
    ALLOWED_CHARS.is_match(input)
}

/// Check if the input is a single finished number (`-12`, `3.5`).
///
/// Dangling points (`3.`) and expressions are rejected.
pub fn is_finished_number(input: &str) -> bool {
    FINISHED_NUMBER.is_match(input)
}

/// The numeric token currently being typed at the end of `buffer`.
pub fn trailing_numeric_token(buffer: &str) -> &str {
    TRAILING_NUMBER
        .find(buffer)
        .map(|m| m.as_str())
        .unwrap_or("")
}

/// Count decimal digits, ignoring sign, point, and everything else.
pub fn digit_count(token: &str) -> usize {
    token.chars().filter(|c| c.is_ascii_digit()).count()
}

pub fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/')
}

/// Whether `c` ends something a following `(` should multiply with.
pub fn ends_operand(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == ')'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_chars() {
        assert!(has_only_allowed_chars("12+3*2"));
        assert!(has_only_allowed_chars(" (1.5 + 2.25) * 4 "));
        assert!(has_only_allowed_chars("-(-5)"));
    }

    #[test]
    fn test_disallowed_chars() {
        assert!(!has_only_allowed_chars(""));
        assert!(!has_only_allowed_chars("alert(1)"));
        assert!(!has_only_allowed_chars("1e3+1"));
        assert!(!has_only_allowed_chars("2^8"));
        assert!(!has_only_allowed_chars("10 % 3"));
        assert!(!has_only_allowed_chars("1,000"));
    }

    #[test]
    fn test_finished_numbers() {
        assert!(is_finished_number("0"));
        assert!(is_finished_number("-42"));
        assert!(is_finished_number("3.25"));
        assert!(!is_finished_number("3."));
        assert!(!is_finished_number(".5"));
        assert!(!is_finished_number("1+2"));
        assert!(!is_finished_number("--1"));
        assert!(!is_finished_number(""));
    }

    #[test]
    fn test_trailing_token() {
        assert_eq!(trailing_numeric_token("12+345"), "345");
        assert_eq!(trailing_numeric_token("1.5"), "1.5");
        assert_eq!(trailing_numeric_token("(2-0."), "0.");
        assert_eq!(trailing_numeric_token("7*("), "");
        assert_eq!(trailing_numeric_token(""), "");
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count("-12.50"), 4);
        assert_eq!(digit_count("0."), 1);
        assert_eq!(digit_count(""), 0);
    }
}
