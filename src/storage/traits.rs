//! Counter storage traits for Fydo.

use std::sync::Arc;

use crate::error::Result;

/// Durable storage for named counters.
///
/// Reads and writes are independent; a caller doing read-then-write gets
/// last-write-wins semantics and no transactional guarantee.
pub trait CounterStore: Send + Sync {
    /// Read a counter.
    ///
    /// Returns `Ok(None)` if nothing was stored under `key`.
    fn read(&self, key: &str) -> Result<Option<u32>>;

    /// Store a counter, replacing any previous value.
    fn write(&self, key: &str, value: u32) -> Result<()>;

    /// Read a counter, treating a missing value as zero.
    fn read_or_zero(&self, key: &str) -> Result<u32> {
        Ok(self.read(key)?.unwrap_or(0))
    }
}

/// Blanket implementation of CounterStore for Arc-wrapped stores.
///
/// Lets a test keep a handle on the store it hands to a finder.
impl<T: CounterStore + ?Sized> CounterStore for Arc<T> {
    fn read(&self, key: &str) -> Result<Option<u32>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: u32) -> Result<()> {
        (**self).write(key, value)
    }
}
