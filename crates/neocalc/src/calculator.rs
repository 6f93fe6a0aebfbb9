//! Calculator façade
//!
//! Owns the state, the history ledger and its store, and queues the
//! events a presentation layer renders. One input is fully processed
//! (state mutated, history persisted, events queued) before the next.

use serde::Serialize;

use crate::config::{CalculatorConfig, ConfigError};
use crate::core::evaluator::{format_result, Evaluation, Evaluator};
use crate::core::history::{History, HistoryEntry};
use crate::core::input::CalculatorState;
use crate::core::{CalcResult, Operator};
use crate::keypad::KeypadAction;
use crate::storage::{HistoryStore, KeyValueStore, MemoryStore};

/// Notifications for the presentation layer
///
/// Serializes as `{"type": "display" | "hint" | "historyChanged", "payload": ...}`
/// for hosts on the other side of a JS boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum CalculatorEvent {
    /// The display changed
    Display {
        /// Main display value
        #[serde(rename = "currentValue")]
        current_value: String,
        /// Pending expression line
        expression: String,
    },
    /// A transient message for the hint bar
    Hint(String),
    /// The history ledger changed; newest first
    HistoryChanged(Vec<HistoryEntry>),
}

/// Browser calculator core
#[derive(Debug)]
pub struct Calculator<S: KeyValueStore = MemoryStore> {
    state: CalculatorState,
    history: History,
    evaluator: Evaluator,
    store: HistoryStore<S>,
    events: Vec<CalculatorEvent>,
}

impl Default for Calculator<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator<MemoryStore> {
    /// Creates a calculator with default settings and an in-memory store
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_config(MemoryStore::new())
    }
}

impl<S: KeyValueStore> Calculator<S> {
    /// Creates a calculator with default settings over `store`
    pub fn with_default_config(store: S) -> Self {
        Self::build(&CalculatorConfig::default(), store)
    }

    /// Creates a calculator, loading any persisted history from `store`
    ///
    /// The configuration is validated first; an invalid one is rejected
    /// before the store is read.
    pub fn with_store(config: &CalculatorConfig, store: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, store))
    }

    fn build(config: &CalculatorConfig, store: S) -> Self {
        let store = HistoryStore::new(store, config.history_key.clone());
        let history = store.load(config.history_capacity);
        tracing::info!(entries = history.len(), key = %store.key(), "calculator history loaded");

        let mut calculator = Self {
            state: CalculatorState::with_settings(
                config.error_sentinel.clone(),
                config.decimal_places,
            ),
            history,
            evaluator: Evaluator::with_decimal_places(config.decimal_places),
            store,
            events: Vec::new(),
        };

        if !calculator.history.is_empty() {
            calculator.emit_history();
        }
        calculator.emit_display();
        calculator.hint("Calculator ready");
        calculator
    }

    /// The current state
    #[must_use]
    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// The value on the main display
    #[must_use]
    pub fn current_value(&self) -> &str {
        self.state.current_value()
    }

    /// The pending expression
    #[must_use]
    pub fn expression(&self) -> &str {
        self.state.expression()
    }

    /// The history ledger
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The backing key-value store
    #[must_use]
    pub fn store(&self) -> &S {
        self.store.inner()
    }

    /// Drains the queued events, oldest first
    pub fn take_events(&mut self) -> Vec<CalculatorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Applies one keypad action
    ///
    /// Only `Evaluate` can fail; the error has already been folded into the
    /// state and hinted, it is returned so hosts can react too.
    pub fn dispatch(&mut self, action: KeypadAction) -> CalcResult<()> {
        tracing::debug!(?action, "dispatch");
        match action {
            KeypadAction::Digit(d) => self.input_digit(d),
            KeypadAction::Operator(op) => self.input_operator(op),
            KeypadAction::Decimal => self.input_decimal_point(),
            KeypadAction::Evaluate => {
                self.evaluate()?;
            }
            KeypadAction::Backspace => self.backspace(),
            KeypadAction::Clear => self.clear(),
            KeypadAction::MemoryRecall => self.memory_recall(),
            KeypadAction::MemoryClear => self.memory_clear(),
            KeypadAction::MemoryAdd => self.memory_add(),
            KeypadAction::MemorySubtract => self.memory_subtract(),
            KeypadAction::SelectHistory(index) => {
                self.select_history(index);
            }
            KeypadAction::ClearHistory => self.clear_history(),
        }
        Ok(())
    }

    /// Handles a keyboard key; returns `Ok(false)` for keys the calculator ignores
    pub fn handle_key(&mut self, key: &str) -> CalcResult<bool> {
        match KeypadAction::from_key(key) {
            Some(action) => self.dispatch(action).map(|()| true),
            None => Ok(false),
        }
    }

    /// Appends a digit
    pub fn input_digit(&mut self, digit: u8) {
        self.state.input_digit(digit);
        self.emit_display();
    }

    /// Commits the current value and an operator
    pub fn input_operator(&mut self, op: Operator) {
        self.state.input_operator(op);
        self.emit_display();
    }

    /// Adds a decimal point
    pub fn input_decimal_point(&mut self) {
        self.state.input_decimal_point();
        self.emit_display();
    }

    /// Removes the last character
    pub fn backspace(&mut self) {
        self.state.backspace();
        self.emit_display();
    }

    /// Clears the display and pending expression
    pub fn clear(&mut self) {
        self.state.clear();
        self.hint("Display cleared");
        self.emit_display();
    }

    /// MR
    pub fn memory_recall(&mut self) {
        self.state.memory_recall();
        let memory = format_result(self.state.memory(), self.state.decimal_places());
        self.hint(format!("Recalled from memory: {memory}"));
        self.emit_display();
    }

    /// MC
    pub fn memory_clear(&mut self) {
        self.state.memory_clear();
        self.hint("Memory cleared");
        self.emit_display();
    }

    /// M+
    pub fn memory_add(&mut self) {
        self.state.memory_add();
        self.hint(format!("Added to memory: {}", self.state.current_value()));
        self.emit_display();
    }

    /// M-
    pub fn memory_subtract(&mut self) {
        self.state.memory_subtract();
        self.hint(format!("Subtracted from memory: {}", self.state.current_value()));
        self.emit_display();
    }

    /// Evaluates `expression + current_value`
    ///
    /// A successful evaluation is recorded and persisted. A failed one
    /// leaves the error sentinel on the display.
    pub fn evaluate(&mut self) -> CalcResult<Evaluation> {
        match self.evaluator.evaluate(&mut self.state, &mut self.history) {
            Ok(Evaluation::Skipped) => Ok(Evaluation::Skipped),
            Ok(Evaluation::Completed(entry)) => {
                tracing::debug!(
                    expression = entry.expression(),
                    result = entry.result(),
                    "evaluation succeeded"
                );
                self.persist_history();
                self.emit_display();
                self.emit_history();
                self.hint(format!("Result: {}", entry.result()));
                Ok(Evaluation::Completed(entry))
            }
            Err(e) => {
                tracing::debug!(error = %e, "evaluation failed");
                self.emit_display();
                self.hint("Invalid expression");
                Err(e)
            }
        }
    }

    /// Loads history entry `index` (0 = newest) back into the display
    ///
    /// Returns false when there is no such entry.
    pub fn select_history(&mut self, index: usize) -> bool {
        let Some((current_value, expression)) = self.history.restore(index) else {
            return false;
        };
        self.state.restore(current_value, expression);
        self.emit_display();
        self.hint("Expression restored from history");
        true
    }

    /// Drops every history entry, in memory and in the store
    pub fn clear_history(&mut self) {
        self.history.clear();
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to remove persisted history");
        }
        tracing::info!("calculator history cleared");
        self.emit_history();
        self.hint("History cleared");
    }

    fn persist_history(&mut self) {
        if let Err(e) = self.store.save(&self.history) {
            tracing::warn!(error = %e, "failed to persist history");
        }
    }

    fn emit_display(&mut self) {
        self.events.push(CalculatorEvent::Display {
            current_value: self.state.current_value().to_string(),
            expression: self.state.expression().to_string(),
        });
    }

    fn emit_history(&mut self) {
        self.events
            .push(CalculatorEvent::HistoryChanged(self.history.to_vec()));
    }

    fn hint(&mut self, message: impl Into<String>) {
        self.events.push(CalculatorEvent::Hint(message.into()));
    }
}
