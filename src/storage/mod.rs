//! Counter storage for Fydo.
//!
//! The attempt counter survives process restarts through a small key/value
//! store. File-based and in-memory backends are provided.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileCounterStore;
pub use memory::MemoryCounterStore;
pub use traits::CounterStore;
