//! Keypad and keyboard input mapping
//!
//! Translates pointer clicks (the `data-num` / `data-op` / `data-action`
//! attributes of the widget's buttons) and keyboard keys into
//! [`KeypadAction`]s the calculator understands.

use crate::core::Operator;

/// Everything the calculator can be asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadAction {
    /// Insert a digit (0-9)
    Digit(u8),
    /// Insert an operator or parenthesis
    Operator(Operator),
    /// Insert a decimal point
    Decimal,
    /// Evaluate the expression
    Evaluate,
    /// Remove the last character
    Backspace,
    /// Clear the display and pending expression
    Clear,
    /// MR
    MemoryRecall,
    /// MC
    MemoryClear,
    /// M+
    MemoryAdd,
    /// M-
    MemorySubtract,
    /// Load a history entry (0 = newest) back into the display
    SelectHistory(usize),
    /// Drop every history entry
    ClearHistory,
}

impl KeypadAction {
    /// Maps a keyboard `KeyboardEvent.key` value to an action
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "." | "," => return Some(Self::Decimal),
            "=" | "Enter" => return Some(Self::Evaluate),
            "Escape" => return Some(Self::Clear),
            "Backspace" => return Some(Self::Backspace),
            _ => {}
        }

        let mut chars = key.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return None;
        };

        if let Some(d) = ch.to_digit(10) {
            return Some(Self::Digit(d as u8));
        }
        Operator::from_key(ch).map(Self::Operator)
    }

    /// Maps a keypad digit button (`data-num`)
    #[must_use]
    pub fn from_num(num: &str) -> Option<Self> {
        match num.parse::<u8>() {
            Ok(d) if d <= 9 && num.len() == 1 => Some(Self::Digit(d)),
            _ => None,
        }
    }

    /// Maps a keypad operator button (`data-op`)
    #[must_use]
    pub fn from_op(op: &str) -> Option<Self> {
        let mut chars = op.chars();
        match (chars.next(), chars.next()) {
            (Some(glyph), None) => Operator::from_glyph(glyph).map(Self::Operator),
            _ => None,
        }
    }

    /// Maps a function button (`data-action`)
    #[must_use]
    pub fn from_data_action(action: &str) -> Option<Self> {
        match action {
            "decimal" => Some(Self::Decimal),
            "calculate" => Some(Self::Evaluate),
            "clear" => Some(Self::Clear),
            "backspace" => Some(Self::Backspace),
            "mr" => Some(Self::MemoryRecall),
            "mc" => Some(Self::MemoryClear),
            "m-plus" => Some(Self::MemoryAdd),
            "m-minus" => Some(Self::MemorySubtract),
            "clear-history" => Some(Self::ClearHistory),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Keyboard mapping tests =====

    #[test]
    fn test_from_key_digits() {
        for d in 0..=9u8 {
            assert_eq!(
                KeypadAction::from_key(&d.to_string()),
                Some(KeypadAction::Digit(d))
            );
        }
    }

    #[test]
    fn test_from_key_operators() {
        assert_eq!(
            KeypadAction::from_key("*"),
            Some(KeypadAction::Operator(Operator::Multiply))
        );
        assert_eq!(
            KeypadAction::from_key("/"),
            Some(KeypadAction::Operator(Operator::Divide))
        );
        assert_eq!(
            KeypadAction::from_key("%"),
            Some(KeypadAction::Operator(Operator::Percent))
        );
        assert_eq!(
            KeypadAction::from_key(")"),
            Some(KeypadAction::Operator(Operator::CloseParen))
        );
    }

    #[test]
    fn test_from_key_special() {
        assert_eq!(KeypadAction::from_key(","), Some(KeypadAction::Decimal));
        assert_eq!(KeypadAction::from_key("."), Some(KeypadAction::Decimal));
        assert_eq!(KeypadAction::from_key("Enter"), Some(KeypadAction::Evaluate));
        assert_eq!(KeypadAction::from_key("="), Some(KeypadAction::Evaluate));
        assert_eq!(KeypadAction::from_key("Escape"), Some(KeypadAction::Clear));
        assert_eq!(
            KeypadAction::from_key("Backspace"),
            Some(KeypadAction::Backspace)
        );
    }

    #[test]
    fn test_from_key_ignored() {
        for key in ["a", "Shift", "^", "12", "", "×", "F5"] {
            assert_eq!(KeypadAction::from_key(key), None, "key {key:?}");
        }
    }

    // ===== Pointer mapping tests =====

    #[test]
    fn test_from_num() {
        assert_eq!(KeypadAction::from_num("7"), Some(KeypadAction::Digit(7)));
        assert_eq!(KeypadAction::from_num("10"), None);
        assert_eq!(KeypadAction::from_num("x"), None);
    }

    #[test]
    fn test_from_op_uses_display_glyphs() {
        assert_eq!(
            KeypadAction::from_op("×"),
            Some(KeypadAction::Operator(Operator::Multiply))
        );
        assert_eq!(
            KeypadAction::from_op("÷"),
            Some(KeypadAction::Operator(Operator::Divide))
        );
        assert_eq!(KeypadAction::from_op("*"), None);
        assert_eq!(KeypadAction::from_op("++"), None);
    }

    #[test]
    fn test_from_data_action() {
        let cases = [
            ("decimal", KeypadAction::Decimal),
            ("calculate", KeypadAction::Evaluate),
            ("clear", KeypadAction::Clear),
            ("mr", KeypadAction::MemoryRecall),
            ("mc", KeypadAction::MemoryClear),
            ("m-plus", KeypadAction::MemoryAdd),
            ("m-minus", KeypadAction::MemorySubtract),
            ("clear-history", KeypadAction::ClearHistory),
        ];
        for (attr, action) in cases {
            assert_eq!(KeypadAction::from_data_action(attr), Some(action));
        }
        assert_eq!(KeypadAction::from_data_action("theme"), None);
    }
}
