//! Logical calculator keys and the input adapters that produce them.
//!
//! Both the on-screen keypad and the physical keyboard end up as the same
//! [`Key`] values, so the editor never needs to know where a key came from.

use std::fmt;

/// A binary (or, for `-`, unary) arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// The character this operator occupies in the expression buffer.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            _ => None,
        }
    }
}

/// A semantic key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A decimal digit. Values above 9 are rejected as unknown input.
    Digit(u8),
    /// The decimal point.
    Point,
    Operator(Operator),
    OpenParen,
    CloseParen,
    /// Evaluate the buffer in place (`=`).
    Equals,
    /// Clear the whole buffer (`C`).
    Clear,
    /// Remove the last character (`DEL`).
    Delete,
}

/// The on-screen keypad, four rows of five buttons.
pub const KEYPAD: [Key; 20] = [
    Key::Digit(7),
    Key::Digit(8),
    Key::Digit(9),
    Key::Operator(Operator::Add),
    Key::Clear,
    Key::Digit(4),
    Key::Digit(5),
    Key::Digit(6),
    Key::Operator(Operator::Subtract),
    Key::OpenParen,
    Key::Digit(1),
    Key::Digit(2),
    Key::Digit(3),
    Key::Operator(Operator::Multiply),
    Key::CloseParen,
    Key::Point,
    Key::Digit(0),
    Key::Equals,
    Key::Operator(Operator::Divide),
    Key::Delete,
];

/// Number of buttons per keypad row.
pub const KEYPAD_COLUMNS: usize = 5;

impl Key {
    /// Parse a canonical key label (`0`-`9`, `.`, `+ - * /`, `(`, `)`, `=`, `C`, `DEL`).
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "." => Some(Self::Point),
            "(" => Some(Self::OpenParen),
            ")" => Some(Self::CloseParen),
            "=" => Some(Self::Equals),
            "C" => Some(Self::Clear),
            "DEL" => Some(Self::Delete),
            _ => {
                let mut chars = label.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                if let Some(d) = c.to_digit(10) {
                    return Some(Self::Digit(d as u8));
                }
                Operator::from_char(c).map(Self::Operator)
            }
        }
    }

    /// Map a keyboard key name to a calculator key.
    ///
    /// Accepts everything [`Key::parse`] does plus the usual keyboard aliases
    /// (`Enter`, `Backspace`, `Escape`, `x`, `×`, `÷`, `Numpad7`, ...).
    pub fn from_keyboard(name: &str) -> Option<Self> {
        if let Some(key) = Self::parse(name) {
            return Some(key);
        }

        match name {
            "Enter" | "NumpadEnter" => Some(Self::Equals),
            "Backspace" | "Delete" | "del" => Some(Self::Delete),
            "Escape" | "c" => Some(Self::Clear),
            "x" | "X" | "×" | "NumpadMultiply" => Some(Self::Operator(Operator::Multiply)),
            "÷" | "NumpadDivide" => Some(Self::Operator(Operator::Divide)),
            "NumpadAdd" => Some(Self::Operator(Operator::Add)),
            "NumpadSubtract" => Some(Self::Operator(Operator::Subtract)),
            "NumpadDecimal" | "," => Some(Self::Point),
            _ => name
                .strip_prefix("Numpad")
                .or_else(|| name.strip_prefix("Digit"))
                .and_then(Self::parse)
                .filter(|key| matches!(key, Self::Digit(_))),
        }
    }

    /// The text printed on the keypad button.
    pub fn label(self) -> String {
        match self {
            Self::Digit(d) => d.to_string(),
            Self::Point => ".".to_string(),
            Self::Operator(op) => op.symbol().to_string(),
            Self::OpenParen => "(".to_string(),
            Self::CloseParen => ")".to_string(),
            Self::Equals => "=".to_string(),
            Self::Clear => "C".to_string(),
            Self::Delete => "⌫".to_string(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete => f.write_str("DEL"),
            other => f.write_str(&other.label()),
        }
    }
}

/// Tells taps apart from drag-scrolls on touch screens.
///
/// A key is only emitted when the pointer was released within `threshold`
/// pixels of where it went down.
#[derive(Clone, Debug)]
pub struct TapClassifier {
    threshold: f32,
    origin: Option<(f32, f32)>,
}

impl TapClassifier {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.max(0.0),
            origin: None,
        }
    }

    /// Record where the pointer went down.
    pub fn press(&mut self, x: f32, y: f32) {
        self.origin = Some((x, y));
    }

    /// Finish a gesture over `key`, returning it if the gesture was a tap.
    pub fn release(&mut self, x: f32, y: f32, key: Key) -> Option<Key> {
        let (ox, oy) = self.origin.take()?;
        let distance = ((x - ox).powi(2) + (y - oy).powi(2)).sqrt();
        (distance <= self.threshold).then_some(key)
    }

    /// Drop a gesture the platform cancelled.
    pub fn cancel(&mut self) {
        self.origin = None;
    }
}
