//! Calculation history
//!
//! A bounded, most-recent-first ledger of completed evaluations. Entries
//! are immutable once recorded; the only way out is eviction or `clear`.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A single entry in the calculation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    expression: String,
    result: String,
    timestamp: String,
}

impl HistoryEntry {
    /// Creates a new history entry stamped with the local wall-clock time
    #[must_use]
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self::with_timestamp(expression, result, Self::current_timestamp())
    }

    /// Creates a history entry with a specific timestamp (for testing)
    #[must_use]
    pub fn with_timestamp(
        expression: impl Into<String>,
        result: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
            timestamp: timestamp.into(),
        }
    }

    fn current_timestamp() -> String {
        chrono::Local::now().format("%H:%M:%S").to_string()
    }

    /// The expression that was evaluated, as it was displayed
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The formatted result
    #[must_use]
    pub fn result(&self) -> &str {
        &self.result
    }

    /// Local time of the evaluation
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Returns `(current_value, expression)` to load back into the display
    ///
    /// Only the part of the expression before any `=` is kept. Recorded
    /// expressions never contain one, so this is the whole expression.
    #[must_use]
    pub fn restore(&self) -> (String, String) {
        let expression = self
            .expression
            .split('=')
            .next()
            .unwrap_or_default()
            .to_string();
        (self.result.clone(), expression)
    }

    /// Returns a formatted display string
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} = {}", self.expression, self.result)
    }
}

/// Calculator history ledger
#[derive(Debug, Clone)]
pub struct History {
    /// Newest entry at the front
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Default maximum history size
    pub const DEFAULT_MAX_ENTRIES: usize = 10;

    /// Creates a new history with default capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_ENTRIES)
    }

    /// Creates a history with custom maximum size
    #[must_use]
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries.min(Self::DEFAULT_MAX_ENTRIES)),
            max_entries,
        }
    }

    /// Adds an entry at the front, evicting the oldest when over capacity
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.max_entries);
    }

    /// Returns the number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the history is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of entries
    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Clears all history entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns an iterator over the entries (newest first)
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Returns the most recent entry
    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Returns the oldest entry still kept
    #[must_use]
    pub fn oldest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Returns the entry at the given index (0 = newest)
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Restores the entry at `index`, see [`HistoryEntry::restore`]
    #[must_use]
    pub fn restore(&self, index: usize) -> Option<(String, String)> {
        self.get(index).map(HistoryEntry::restore)
    }

    /// Returns a snapshot of all entries (newest first)
    #[must_use]
    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Serializes the history to a JSON array, newest first
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    /// Deserializes history from a JSON array, newest first
    pub fn from_json(json: &str, max_entries: usize) -> Result<Self, serde_json::Error> {
        let mut entries: VecDeque<HistoryEntry> = serde_json::from_str(json)?;
        entries.truncate(max_entries);
        Ok(Self {
            entries,
            max_entries,
        })
    }

    /// Like [`History::from_json`], but corrupted input yields an empty history
    #[must_use]
    pub fn from_json_lossy(json: &str, max_entries: usize) -> Self {
        Self::from_json(json, max_entries).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding corrupted calculator history");
            Self::with_capacity(max_entries)
        })
    }
}
