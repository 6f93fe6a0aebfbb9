//! Input accumulation
//!
//! Turns discrete key presses into an updated `(expression, current_value)`
//! pair. Every operation takes the state by `&mut` and touches nothing else.

use crate::core::evaluator::format_result;
use crate::core::{Operator, DEFAULT_DECIMAL_PLACES, DEFAULT_ERROR_SENTINEL};

/// Whether the next digit extends the displayed number or replaces it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Digits append to `current_value`
    #[default]
    Entering,
    /// The display holds an operand, result or recalled value; the next
    /// digit or decimal point starts a fresh number
    AwaitingNewOperand,
}

/// The calculator's mutable state
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    /// Number being typed, last result, or the error sentinel
    pub(crate) current_value: String,
    /// Completed `value operator ` pairs preceding `current_value`
    pub(crate) expression: String,
    /// Memory register
    pub(crate) memory: f64,
    /// Pending operator, if any
    pub(crate) last_operation: Option<Operator>,
    pub(crate) mode: InputMode,
    error_sentinel: String,
    decimal_places: usize,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorState {
    /// Creates a fresh state showing `0`
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_ERROR_SENTINEL, DEFAULT_DECIMAL_PLACES)
    }

    /// Creates a fresh state with a custom error sentinel and result precision
    #[must_use]
    pub fn with_settings(error_sentinel: impl Into<String>, decimal_places: usize) -> Self {
        Self {
            current_value: "0".to_string(),
            expression: String::new(),
            memory: 0.0,
            last_operation: None,
            mode: InputMode::Entering,
            error_sentinel: error_sentinel.into(),
            decimal_places,
        }
    }

    /// The value on the main display
    #[must_use]
    pub fn current_value(&self) -> &str {
        &self.current_value
    }

    /// The pending expression shown above the main display
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The memory register
    #[must_use]
    pub fn memory(&self) -> f64 {
        self.memory
    }

    /// The pending operator
    #[must_use]
    pub fn last_operation(&self) -> Option<Operator> {
        self.last_operation
    }

    /// The current input mode
    #[must_use]
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// The string displayed after a failed evaluation
    #[must_use]
    pub fn error_sentinel(&self) -> &str {
        &self.error_sentinel
    }

    /// Number of decimal places results are rounded to
    #[must_use]
    pub fn decimal_places(&self) -> usize {
        self.decimal_places
    }

    /// Returns true when the display shows the error sentinel
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.current_value == self.error_sentinel
    }

    /// Appends a digit (0-9)
    ///
    /// A digit pressed while the sentinel is showing starts a new number
    /// instead of being appended to the sentinel text.
    pub fn input_digit(&mut self, digit: u8) {
        let Some(ch) = char::from_digit(u32::from(digit), 10) else {
            return;
        };

        if self.mode == InputMode::AwaitingNewOperand || self.is_error() {
            self.current_value.clear();
            self.mode = InputMode::Entering;
        }

        if self.current_value == "0" {
            self.current_value.clear();
        }
        self.current_value.push(ch);
    }

    /// Commits `current_value` and an operator to the expression
    ///
    /// Pressing a second operator before typing a new operand replaces the
    /// pending one instead of stacking `5 + × `.
    pub fn input_operator(&mut self, op: Operator) {
        if self.is_error() {
            self.current_value = "0".to_string();
        }

        let segment = format!("{} {} ", self.current_value, op.glyph());
        if self.mode == InputMode::AwaitingNewOperand && self.last_operation.is_some() {
            self.expression = segment;
        } else {
            self.expression.push_str(&segment);
        }

        self.mode = InputMode::AwaitingNewOperand;
        self.last_operation = Some(op);
    }

    /// Adds a decimal point; a second point in the same number is ignored
    pub fn input_decimal_point(&mut self) {
        if self.mode == InputMode::AwaitingNewOperand {
            self.current_value = "0.".to_string();
            self.mode = InputMode::Entering;
        } else if !self.current_value.contains('.') {
            self.current_value.push('.');
        }
    }

    /// Removes the last character, falling back to `0`
    pub fn backspace(&mut self) {
        if self.current_value.chars().count() > 1 {
            self.current_value.pop();
        } else {
            self.current_value = "0".to_string();
        }
    }

    /// Resets the display and pending expression; memory is kept
    pub fn clear(&mut self) {
        self.current_value = "0".to_string();
        self.expression.clear();
        self.last_operation = None;
    }

    /// Loads the memory register onto the display
    pub fn memory_recall(&mut self) {
        self.current_value = format_result(self.memory, self.decimal_places);
        self.mode = InputMode::AwaitingNewOperand;
    }

    /// Zeroes the memory register
    pub fn memory_clear(&mut self) {
        self.memory = 0.0;
    }

    /// Adds the displayed value to memory
    pub fn memory_add(&mut self) {
        self.memory += self.display_number();
    }

    /// Subtracts the displayed value from memory
    pub fn memory_subtract(&mut self) {
        self.memory -= self.display_number();
    }

    /// Replaces the display with a recalled history entry
    pub fn restore(&mut self, current_value: String, expression: String) {
        self.current_value = current_value;
        self.expression = expression;
        self.mode = InputMode::AwaitingNewOperand;
    }

    /// Numeric value of the display, `0` when it is not a number
    fn display_number(&self) -> f64 {
        parse_float(&self.current_value)
            .filter(|v| !v.is_nan())
            .unwrap_or(0.0)
    }
}

/// Parses the longest numeric prefix of `input`
///
/// Leading whitespace and a sign are accepted, then digits with at most
/// one decimal point. Returns `None` when no digit was found.
#[must_use]
pub fn parse_float(input: &str) -> Option<f64> {
    let trimmed = input.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, ch) in trimmed.char_indices() {
        match ch {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + ch.len_utf8();
    }

    if !seen_digit {
        return None;
    }

    let literal = trimmed[..end].trim_end_matches('.');
    literal.parse().ok()
}
