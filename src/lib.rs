//! S3 Migration Proxy - serve a bucket while it is being migrated
//!
//! Reads are answered from the target bucket, falling back to the source
//! bucket. Objects found only in source are copied into target in the
//! background; keys missing from both are remembered for a configurable TTL.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod resolver;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use resolver::Resolver;
pub use tasks::spawn_cleanup_task;
