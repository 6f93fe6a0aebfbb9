//! Browser WASM bindings for the calculator
//!
//! The page script forwards keyboard and button input here, then drains
//! [`BrowserCalculator::take_events_json`] and renders what comes back.

use wasm_bindgen::prelude::*;
use web_sys::console;

use crate::calculator::Calculator;
use crate::config::CalculatorConfig;
use crate::keypad::KeypadAction;
use crate::storage::{KeyValueStore, MemoryStore};
use crate::wasm::LocalStorage;

/// Browser Calculator - the main WASM entry point
#[derive(Debug)]
#[wasm_bindgen]
pub struct BrowserCalculator {
    calculator: Calculator<Box<dyn KeyValueStore>>,
}

#[wasm_bindgen]
impl BrowserCalculator {
    /// Create a calculator backed by `localStorage`
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();
        Self {
            calculator: Calculator::with_default_config(open_store()),
        }
    }

    /// Create a calculator from a JSON configuration
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config_json(json: &str) -> Result<BrowserCalculator, JsValue> {
        console_error_panic_hook::set_once();
        let config =
            CalculatorConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let calculator = Calculator::with_store(&config, open_store())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { calculator })
    }

    /// Main display value
    #[wasm_bindgen(getter, js_name = currentValue)]
    pub fn current_value(&self) -> String {
        self.calculator.current_value().to_string()
    }

    /// Pending expression line
    #[wasm_bindgen(getter)]
    pub fn expression(&self) -> String {
        self.calculator.expression().to_string()
    }

    /// Handle a keyboard key; returns true when the page should `preventDefault`
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, key: &str) -> bool {
        match KeypadAction::from_key(key) {
            Some(action) => {
                self.apply(action);
                true
            }
            None => false,
        }
    }

    /// Handle a keypad button click
    ///
    /// `kind` is the data attribute the button carries (`num`, `op` or
    /// `action`) and `value` its content.
    #[wasm_bindgen(js_name = handleButton)]
    pub fn handle_button(&mut self, kind: &str, value: &str) -> bool {
        let action = match kind {
            "num" => KeypadAction::from_num(value),
            "op" => KeypadAction::from_op(value),
            "action" => KeypadAction::from_data_action(value),
            _ => None,
        };
        match action {
            Some(action) => {
                self.apply(action);
                true
            }
            None => {
                tracing::debug!(kind, value, "unmapped button");
                false
            }
        }
    }

    /// Restore history entry `index` (0 = newest)
    #[wasm_bindgen(js_name = selectHistory)]
    pub fn select_history(&mut self, index: usize) -> bool {
        self.calculator.select_history(index)
    }

    /// Clear history and its persisted copy
    #[wasm_bindgen(js_name = clearHistory)]
    pub fn clear_history(&mut self) {
        self.calculator.clear_history();
    }

    /// Get history as JSON, newest first
    #[wasm_bindgen(js_name = historyJson)]
    pub fn history_json(&self) -> String {
        self.calculator
            .history()
            .to_json()
            .unwrap_or_else(|_| "[]".to_string())
    }

    /// Get history entry `index` (0 = newest) as `expression = result`
    #[wasm_bindgen(js_name = historyEntry)]
    pub fn history_entry(&self, index: usize) -> Option<String> {
        self.calculator.history().get(index).map(|e| e.display())
    }

    /// Drain queued events as a JSON array
    #[wasm_bindgen(js_name = takeEventsJson)]
    pub fn take_events_json(&mut self) -> String {
        let events = self.calculator.take_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to serialize calculator events");
            "[]".to_string()
        })
    }
}

impl BrowserCalculator {
    // Evaluation failures are already on the display and in the hint queue.
    fn apply(&mut self, action: KeypadAction) {
        let _ = self.calculator.dispatch(action);
    }
}

impl Default for BrowserCalculator {
    fn default() -> Self {
        Self::new()
    }
}

fn open_store() -> Box<dyn KeyValueStore> {
    match LocalStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            tracing::warn!(error = %e, "localStorage unavailable, history will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

/// Initialize the calculator in the browser
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console::log_1(&"Calculator WASM initialized".into());
}
