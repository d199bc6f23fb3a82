//! API middleware components

pub mod auth;
pub mod logging;

pub use auth::RequirePrincipal;
pub use logging::logging_middleware;
