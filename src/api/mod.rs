//! API Module
//!
//! HTTP handler and routing for the migration proxy.
//!
//! # Endpoints
//! - `ANY /*key` - Serve the object stored at `key`

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
