//! Infrastructure layer - stores, collaborators and services

pub mod auth;
pub mod flow_version;
pub mod id;
pub mod logging;
pub mod services;
pub mod step_output;
pub mod step_run;
pub mod storage;
