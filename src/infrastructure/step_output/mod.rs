//! Step output persistence

mod in_memory;

pub use in_memory::InMemoryStepOutputStore;
