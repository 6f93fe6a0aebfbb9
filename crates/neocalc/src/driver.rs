//! Calculator drivers
//!
//! A driver is what a presentation layer looks like from the core's side:
//! it pushes input in and renders the events that come back out. Test
//! scenarios are written once against [`CalculatorDriver`] and run against
//! any implementation.

use crate::calculator::{Calculator, CalculatorEvent};
use crate::core::{CalcError, CalcResult};
use crate::keypad::KeypadAction;
use crate::storage::{KeyValueStore, MemoryStore};

/// Abstract driver trait for calculator interactions
///
/// # Example
///
/// ```rust
/// use neocalc::prelude::*;
///
/// fn verify<D: CalculatorDriver>(driver: &mut D) {
///     driver.type_keys("5+3=").unwrap();
///     assert_eq!(driver.display(), "8");
/// }
///
/// verify(&mut HeadlessDriver::new());
/// ```
pub trait CalculatorDriver {
    /// Applies a single keypad action
    fn press(&mut self, action: KeypadAction) -> CalcResult<()>;

    /// Gets the rendered main display
    fn display(&self) -> String;

    /// Gets the rendered expression line
    fn expression_line(&self) -> String;

    /// Gets the rendered history list (newest first)
    fn history(&self) -> Vec<HistoryItem>;

    /// Gets the most recent hint, if any
    fn last_hint(&self) -> Option<String>;

    /// Types a sequence of keyboard characters, skipping whitespace
    ///
    /// Stops at the first failed evaluation and returns its error.
    fn type_keys(&mut self, keys: &str) -> CalcResult<()> {
        for ch in keys.chars().filter(|c| !c.is_whitespace()) {
            let mut buf = [0u8; 4];
            let key = ch.encode_utf8(&mut buf);
            let action = KeypadAction::from_key(key)
                .ok_or_else(|| CalcError::malformed(format!("Unsupported key: '{ch}'")))?;
            self.press(action)?;
        }
        Ok(())
    }
}

/// A simplified history item as a presentation layer renders it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    /// The expression that was evaluated
    pub expression: String,
    /// The result as displayed
    pub result: String,
}

/// Driver that renders events into plain strings, no DOM required
#[derive(Debug)]
pub struct HeadlessDriver<S: KeyValueStore = MemoryStore> {
    calculator: Calculator<S>,
    display: String,
    expression: String,
    history: Vec<HistoryItem>,
    hints: Vec<String>,
}

impl Default for HeadlessDriver<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDriver<MemoryStore> {
    /// Creates a driver around a default calculator
    #[must_use]
    pub fn new() -> Self {
        Self::with_calculator(Calculator::new())
    }
}

impl<S: KeyValueStore> HeadlessDriver<S> {
    /// Creates a driver around an existing calculator
    pub fn with_calculator(calculator: Calculator<S>) -> Self {
        let mut driver = Self {
            calculator,
            display: String::new(),
            expression: String::new(),
            history: Vec::new(),
            hints: Vec::new(),
        };
        driver.render();
        driver
    }

    /// Returns a reference to the calculator
    #[must_use]
    pub fn calculator(&self) -> &Calculator<S> {
        &self.calculator
    }

    /// Every hint shown so far, oldest first
    #[must_use]
    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    fn render(&mut self) {
        for event in self.calculator.take_events() {
            match event {
                CalculatorEvent::Display {
                    current_value,
                    expression,
                } => {
                    self.display = current_value;
                    self.expression = expression;
                }
                CalculatorEvent::Hint(message) => self.hints.push(message),
                CalculatorEvent::HistoryChanged(entries) => {
                    self.history = entries
                        .iter()
                        .map(|entry| HistoryItem {
                            expression: entry.expression().to_string(),
                            result: entry.result().to_string(),
                        })
                        .collect();
                }
            }
        }
    }
}

impl<S: KeyValueStore> CalculatorDriver for HeadlessDriver<S> {
    fn press(&mut self, action: KeypadAction) -> CalcResult<()> {
        let result = self.calculator.dispatch(action);
        self.render();
        result
    }

    fn display(&self) -> String {
        self.display.clone()
    }

    fn expression_line(&self) -> String {
        self.expression.clone()
    }

    fn history(&self) -> Vec<HistoryItem> {
        self.history.clone()
    }

    fn last_hint(&self) -> Option<String> {
        self.hints.last().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_driver_initial_render() {
        let driver = HeadlessDriver::new();
        assert_eq!(driver.display(), "0");
        assert_eq!(driver.expression_line(), "");
        assert!(driver.history().is_empty());
        assert_eq!(driver.last_hint().as_deref(), Some("Calculator ready"));
    }

    #[test]
    fn test_type_keys_renders_expression() {
        let mut driver = HeadlessDriver::new();
        driver.type_keys("12 * 3").unwrap();
        assert_eq!(driver.display(), "3");
        assert_eq!(driver.expression_line(), "12 × ");
    }

    #[test]
    fn test_type_keys_unsupported_key() {
        let mut driver = HeadlessDriver::new();
        let err = driver.type_keys("2^3").unwrap_err();
        assert_eq!(err, CalcError::malformed("Unsupported key: '^'"));
        assert_eq!(driver.display(), "2");
    }

    #[test]
    fn test_history_rendering() {
        let mut driver = HeadlessDriver::new();
        driver.type_keys("1+1=").unwrap();
        driver.type_keys("2*5=").unwrap();
        assert_eq!(
            driver.history(),
            vec![
                HistoryItem {
                    expression: "2 × 5".into(),
                    result: "10".into(),
                },
                HistoryItem {
                    expression: "1 + 1".into(),
                    result: "2".into(),
                },
            ]
        );
    }

    #[test]
    fn test_press_history_actions() {
        let mut driver = HeadlessDriver::new();
        driver.type_keys("4-1=").unwrap();
        driver.press(KeypadAction::Clear).unwrap();
        driver.press(KeypadAction::SelectHistory(0)).unwrap();
        assert_eq!(driver.display(), "3");
        assert_eq!(driver.expression_line(), "4 - 1");

        driver.press(KeypadAction::ClearHistory).unwrap();
        assert!(driver.history().is_empty());
        assert_eq!(driver.last_hint().as_deref(), Some("History cleared"));
    }

    #[test]
    fn test_with_persisted_calculator() {
        let store = MemoryStore::with_entry(
            "calculator-history",
            r#"[{"expression":"6 ÷ 3","result":"2","timestamp":"07:30:00"}]"#,
        );
        let calc = Calculator::with_default_config(store);
        let driver = HeadlessDriver::with_calculator(calc);
        assert_eq!(driver.history()[0].result, "2");
    }
}
