//! Browser bindings
//!
//! `BrowserCalculator` is the wasm-bindgen entry point the page script
//! talks to; `LocalStorage` persists history in `window.localStorage`.

mod browser;
mod local_storage;

pub use browser::BrowserCalculator;
pub use local_storage::LocalStorage;
