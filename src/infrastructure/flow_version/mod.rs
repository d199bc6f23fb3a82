//! Flow version persistence

mod in_memory_repository;

pub use in_memory_repository::InMemoryFlowVersionRepository;
