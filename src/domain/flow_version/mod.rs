//! Flow version domain

mod entity;
mod repository;

pub use entity::{FlowVersion, FlowVersionState, PastePosition};
pub use repository::FlowVersionRepository;

#[cfg(test)]
pub use repository::mock;
