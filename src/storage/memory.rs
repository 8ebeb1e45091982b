//! In-memory counter storage.
//!
//! Used by tests and by callers that want a session-only counter.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{FydoError, Result};
use crate::storage::CounterStore;

/// In-memory counter store.
///
/// Thread-safe implementation using `RwLock<HashMap>`. Failure injection
/// switches let tests exercise the fail-open paths of callers.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    counters: RwLock<HashMap<String, u32>>,
    fail_reads: RwLock<bool>,
    fail_writes: RwLock<bool>,
}

impl MemoryCounterStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding one counter.
    pub fn with_value(key: &str, value: u32) -> Self {
        let store = Self::new();
        store
            .counters
            .write()
            .unwrap()
            .insert(key.to_string(), value);
        store
    }

    /// Make every subsequent read fail.
    pub fn set_fail_reads(&self, fail: bool) {
        *self.fail_reads.write().unwrap() = fail;
    }

    /// Make every subsequent write fail.
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().unwrap() = fail;
    }

    /// Number of stored counters.
    pub fn len(&self) -> usize {
        self.counters.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.read().unwrap().is_empty()
    }
}

impl CounterStore for MemoryCounterStore {
    fn read(&self, key: &str) -> Result<Option<u32>> {
        if *self.fail_reads.read().unwrap() {
            return Err(FydoError::store_read(key, "injected read failure"));
        }
        Ok(self.counters.read().unwrap().get(key).copied())
    }

    fn write(&self, key: &str, value: u32) -> Result<()> {
        if *self.fail_writes.read().unwrap() {
            return Err(FydoError::store_write(key, "injected write failure"));
        }
        self.counters
            .write()
            .unwrap()
            .insert(key.to_string(), value);
        Ok(())
    }
}
