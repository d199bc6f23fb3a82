//! Flow domain

mod entity;

pub use entity::Flow;
