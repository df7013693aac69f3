//! Background Tasks Module
//!
//! Tasks that run outside the request/response cycle.
//!
//! # Tasks
//! - TTL Cleanup: removes expired negative cache entries at a fixed interval
//! - Migration: copies an object served from source into the target bucket

mod cleanup;
mod migration;

pub use cleanup::spawn_cleanup_task;
pub use migration::MigrationTask;
