//! Remembered selections, keyed per workspace root.
//!
//! Every interactive pick the front end makes is written back here so the
//! next run can skip the prompt. The store is a flat key/value document;
//! the well-known keys below are the ones resolution reads and writes.

pub mod store;

pub use store::SelectionStore;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Remembered workspace or project container path.
pub const WORKSPACE_KEY: &str = "cli.xcworkspace";
/// Remembered scheme name.
pub const SCHEME_KEY: &str = "cli.scheme";
/// Remembered build configuration name.
pub const CONFIGURATION_KEY: &str = "cli.configuration";
/// Remembered destination identifier.
pub const DESTINATION_KEY: &str = "cli.destination.id";

/// Immutable snapshot of the persisted selections.
///
/// Mutation goes through [`with`](SelectionState::with) and
/// [`without`](SelectionState::without), which return a new snapshot; the
/// store layer decides when a replaced snapshot makes the file dirty, so
/// the in-memory value can never drift from what was last flushed without
/// the store noticing. A `BTreeMap` keeps the serialized document stable
/// across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionState(BTreeMap<String, Value>);

impl SelectionState {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Typed accessor for the common case; a remembered value of another
    /// JSON type reads as absent.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// A new snapshot with `key` set. Unrelated keys carry over untouched.
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut entries = self.0.clone();
        entries.insert(key.into(), value.into());
        Self(entries)
    }

    /// A new snapshot with `key` absent.
    pub fn without(&self, key: &str) -> Self {
        let mut entries = self.0.clone();
        entries.remove(key);
        Self(entries)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
