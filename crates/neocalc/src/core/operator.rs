//! Operator tokens as they appear on the keypad and in the expression line

use serde::{Deserialize, Serialize};

/// An operator button press
///
/// Parentheses are entered through the same path as binary operators, so
/// they live here too. The glyph is what ends up in the expression string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (×)
    Multiply,
    /// Division (÷)
    Divide,
    /// Percent (%)
    Percent,
    /// Opening parenthesis
    OpenParen,
    /// Closing parenthesis
    CloseParen,
}

impl Operator {
    /// Every operator the keypad offers, in keypad order
    pub const ALL: [Self; 7] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Percent,
        Self::OpenParen,
        Self::CloseParen,
    ];

    /// Returns the display glyph
    #[must_use]
    pub const fn glyph(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '×',
            Self::Divide => '÷',
            Self::Percent => '%',
            Self::OpenParen => '(',
            Self::CloseParen => ')',
        }
    }

    /// Parses a display glyph (the `data-op` attribute of a keypad button)
    #[must_use]
    pub fn from_glyph(glyph: char) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.glyph() == glyph)
    }

    /// Parses a keyboard key, mapping `*` and `/` to their display glyphs
    #[must_use]
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            '×' | '÷' => None,
            other => Self::from_glyph(other),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}
