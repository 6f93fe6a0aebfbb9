//! Neocalc - browser calculator core
//!
//! Display and expression-line state, a restricted arithmetic evaluator,
//! a bounded persisted history and a memory register. Presentation layers
//! push input through [`calculator::Calculator`] and render the
//! [`calculator::CalculatorEvent`]s it queues.
//!
//! # Example
//!
//! ```rust
//! use neocalc::prelude::*;
//!
//! let mut calc = Calculator::new();
//! for key in ["1", "2", "*", "3", "Enter"] {
//!     calc.handle_key(key).unwrap();
//! }
//! assert_eq!(calc.current_value(), "36");
//! assert_eq!(calc.history().latest().unwrap().expression(), "12 × 3");
//!
//! // Only the four operators and parentheses are evaluated
//! let eval = Evaluator::new();
//! assert_eq!(eval.evaluate_formatted("(2 + 3) × 4").unwrap(), "20");
//! assert!(eval.evaluate_str("1 / 0").is_err());
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod calculator;
pub mod config;
pub mod core;
pub mod driver;
pub mod keypad;
pub mod storage;

/// Browser bindings (wasm-bindgen, `localStorage`)
#[cfg(feature = "wasm")]
pub mod wasm;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::calculator::{Calculator, CalculatorEvent};
    pub use crate::config::{CalculatorConfig, ConfigError};
    pub use crate::core::evaluator::{format_result, Evaluation, Evaluator};
    pub use crate::core::history::{History, HistoryEntry};
    pub use crate::core::input::{CalculatorState, InputMode};
    pub use crate::core::parser::{AstNode, Parser, Token, Tokenizer};
    pub use crate::core::{CalcError, CalcResult, Operator};
    pub use crate::driver::{CalculatorDriver, HeadlessDriver, HistoryItem};
    pub use crate::keypad::KeypadAction;
    pub use crate::storage::{HistoryStore, KeyValueStore, MemoryStore, StorageError};

    #[cfg(feature = "wasm")]
    pub use crate::wasm::{BrowserCalculator, LocalStorage};
}
