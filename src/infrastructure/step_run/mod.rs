//! Step execution

mod sample_data_executor;

pub use sample_data_executor::SampleDataExecutor;
