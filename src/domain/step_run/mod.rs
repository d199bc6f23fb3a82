//! Single-step test runs

mod executor;

pub use executor::{StepExecutor, StepRunOutcome};

#[cfg(test)]
pub use executor::MockStepExecutor;
