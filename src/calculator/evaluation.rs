//! Expression evaluation.
//!
//! A small recursive-descent interpreter for `+ - * /`, parentheses, and
//! unary minus. Input is checked against the arithmetic alphabet first, then
//! tokenized and parsed; nothing else is ever executed.

use super::detection::{digit_count, has_only_allowed_chars};
use super::error::ErrorKind;
use crate::config::DEFAULT_MAX_DIGITS;

/// Result of evaluating an expression: a finite number or a typed error.
pub type EvaluationResult = Result<f64, ErrorKind>;

/// Fractional digits kept in results.
const FRACTION_DIGITS: usize = 10;

/// Maximum nesting of groups and unary signs.
const MAX_DEPTH: usize = 128;

/// Significant digits an `f64` reproduces exactly through a decimal round trip.
const SIGNIFICANT_DIGITS: usize = 15;

/// Evaluate with the default digit ceiling.
pub fn evaluate(input: &str) -> EvaluationResult {
    evaluate_with_limit(input, DEFAULT_MAX_DIGITS)
}

/// Evaluate an expression, rejecting results with more than `max_digits` digits.
pub fn evaluate_with_limit(input: &str, max_digits: usize) -> EvaluationResult {
    let expression = input.trim();

    if expression.is_empty() {
        return Err(ErrorKind::EmptyExpression);
    }

    if !has_only_allowed_chars(expression) {
        return Err(ErrorKind::InvalidCharacters);
    }

    check_parens(expression)?;

    let tokens = tokenize(expression)?;
    let value = Parser::new(&tokens).parse()?;

    if !value.is_finite() {
        return Err(ErrorKind::Overflow);
    }

    let value = round_fraction(value);

    if digit_count(&canonical_string(value)) > max_digits {
        return Err(ErrorKind::ResultTooLarge);
    }

    Ok(value)
}

fn check_parens(expression: &str) -> Result<(), ErrorKind> {
    let mut depth: usize = 0;
    for c in expression.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1).ok_or(ErrorKind::UnbalancedParens)?,
            _ => {}
        }
    }

    if depth == 0 {
        Ok(())
    } else {
        Err(ErrorKind::UnbalancedParens)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(expression: &str) -> Result<Vec<Token>, ErrorKind> {
    let chars: Vec<char> = expression.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let token = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            _ => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                tokens.push(parse_number(&literal)?);
                continue;
            }
        };
        tokens.push(token);
        i += 1;
    }

    Ok(tokens)
}

fn parse_number(literal: &str) -> Result<Token, ErrorKind> {
    // ".5" and "5." are fine, "." and "1.2.3" are not
    if literal.matches('.').count() > 1 || digit_count(literal) == 0 {
        return Err(ErrorKind::InvalidExpression);
    }

    let padded = if literal.starts_with('.') {
        format!("0{literal}")
    } else {
        literal.to_string()
    };

    padded
        .parse::<f64>()
        .map(Token::Number)
        .map_err(|_| ErrorKind::InvalidExpression)
}

/// Recursive-descent parser evaluating as it goes.
///
/// ```text
/// expr    := term (('+' | '-') term)*
/// term    := unary (('*' | '/') unary)*
/// unary   := '-' unary | primary
/// primary := number | '(' expr ')'
/// ```
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn parse(mut self) -> EvaluationResult {
        let value = self.expr()?;
        if self.pos != self.tokens.len() {
            return Err(ErrorKind::InvalidExpression);
        }
        Ok(value)
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> EvaluationResult {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> EvaluationResult {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(ErrorKind::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> EvaluationResult {
        if self.peek() == Some(Token::Minus) {
            self.pos += 1;
            self.descend()?;
            let value = self.unary();
            self.depth -= 1;
            return value.map(|v| -v);
        }
        self.primary()
    }

    fn primary(&mut self) -> EvaluationResult {
        match self.next() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                self.descend()?;
                let value = self.expr()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(ErrorKind::InvalidExpression),
                }
            }
            _ => Err(ErrorKind::InvalidExpression),
        }
    }

    fn descend(&mut self) -> Result<(), ErrorKind> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ErrorKind::InvalidExpression);
        }
        Ok(())
    }
}

/// Round non-integral values to ten fractional digits, half away from zero.
///
/// Rounding never keeps more than fifteen significant digits, the most an
/// `f64` carries faithfully, so large sums like `1234000.1+0.2` lose their
/// binary noise too. The value is nudged away from zero by one relative
/// machine epsilon first, so artefacts like `0.30000000000000004` or a
/// stored `...4999999` that is really a decimal half land on the intended side.
fn round_fraction(value: f64) -> f64 {
    if value.fract() == 0.0 {
        return value + 0.0;
    }

    let int_digits = format!("{:.0}", value.abs().trunc()).len();
    let fraction_digits = FRACTION_DIGITS.min(SIGNIFICANT_DIGITS.saturating_sub(int_digits));
    let nudged = value * (1.0 + f64::EPSILON);

    // `+ 0.0` turns a negative zero into zero
    format!("{:.*}", fraction_digits, nudged)
        .parse::<f64>()
        .unwrap_or(value)
        + 0.0
}

/// The plain decimal form of a value: no exponent, no trailing `.0`.
pub fn canonical_string(value: f64) -> String {
    format!("{}", value + 0.0)
}

/// Format a value for display, optionally with thousand separators.
pub fn format_display(value: f64, thousands_separator: bool) -> String {
    let raw = canonical_string(value);
    if thousands_separator {
        format_with_separators(&raw)
    } else {
        raw
    }
}

/// Insert `,` every three digits in the integer part of a plain decimal string.
pub fn format_with_separators(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
