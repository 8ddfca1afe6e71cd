//! Fragment cache implementations.

pub mod memory;

pub use memory::MemoryFragmentCache;
