//! S3 Migration Proxy - serve a bucket while it is being migrated
//!
//! Reads are answered from the target bucket, falling back to the source
//! bucket and lazily copying source objects into target.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use s3_migration_proxy::api::{create_router, AppState};
use s3_migration_proxy::config::Config;
use s3_migration_proxy::storage::Bucket;
use s3_migration_proxy::tasks::spawn_cleanup_task;

/// Read-through proxy for migrating objects between two buckets.
#[derive(Parser, Debug)]
#[command(name = "s3_migration_proxy")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml", env = "PROXY_CONFIG")]
    config: PathBuf,
}

/// Main entry point for the migration proxy.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from file and environment
/// 3. Build bucket clients and the resolver
/// 4. Start background TTL cleanup task
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "s3_migration_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting S3 migration proxy");

    let config = Config::load(&args.config)
        .with_context(|| format!("Error loading config from {}", args.config.display()))?;

    let state = AppState::from_config(&config);
    info!(
        source = %state.resolver.source().name(),
        target = %state.resolver.target().name(),
        cache_error_duration_secs = config.s3.cache_error_duration,
        cleanup_interval_secs = config.s3.cleanup_interval,
        "Configuration loaded"
    );

    let cleanup_handle = spawn_cleanup_task(state.resolver.cache(), config.cleanup_interval());
    info!("Background cleanup task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Starting S3 proxy server on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(cleanup_handle))
    .await
    .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// In-flight migration tasks are not awaited.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    cleanup_handle.abort();
    warn!("Cleanup task aborted");
}
