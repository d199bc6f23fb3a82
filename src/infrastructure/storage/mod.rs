//! Storage implementations

mod in_memory;

pub use in_memory::InMemoryStorage;
