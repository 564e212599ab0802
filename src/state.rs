//! Process-wide flag/cache state behind an explicit abstraction
//!
//! State is injectable and its concurrency contract is explicit: the
//! in-memory implementation guards its map with a mutex, nothing more.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

/// Injectable key-value state
pub trait KeyValueState: Send + Sync {
    /// The value stored under `key`, if any
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: Value);
}

/// Boolean-flag conveniences over any [`KeyValueState`]
pub trait StateFlags {
    /// Whether the flag is set; unset and non-boolean values read as false
    fn flag(&self, key: &str) -> bool;

    fn set_flag(&self, key: &str, value: bool);
}

impl<S: KeyValueState + ?Sized> StateFlags for S {
    fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    fn set_flag(&self, key: &str, value: bool) {
        self.set(key, Value::Bool(value));
    }
}

/// Mutex-guarded in-memory [`KeyValueState`]
#[derive(Debug, Default)]
pub struct InMemoryState {
    entries: Mutex<HashMap<String, Value>>,
}

impl InMemoryState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueState for InMemoryState {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .expect("state lock poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.entries
            .lock()
            .expect("state lock poisoned")
            .insert(key.to_string(), value);
    }
}
