//! Request-scoped models
//!
//! Values that live for the duration of one request: the object found by the
//! resolver and the terminal state it reached.

pub mod object;
pub mod resolution;

// Re-export commonly used types
pub use object::{ObjectOrigin, ResolvedObject};
pub use resolution::Resolution;
