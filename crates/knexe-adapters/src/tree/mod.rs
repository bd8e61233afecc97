//! Tree adapters.

mod memory;

pub use memory::MemoryTree;
