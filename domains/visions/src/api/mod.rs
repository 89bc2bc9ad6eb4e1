//! API layer for the Visions domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::VisionsState;
pub use routes::routes;
