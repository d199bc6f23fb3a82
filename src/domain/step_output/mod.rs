//! Step test output domain

mod entity;
mod repository;

pub use entity::{StepOutputWithData, StepTestOutput};
pub use repository::StepOutputStore;

#[cfg(test)]
pub use repository::MockStepOutputStore;
