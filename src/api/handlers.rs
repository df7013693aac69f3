//! API Handlers
//!
//! The single request handler that turns a path into an object key and hands
//! it to the resolver.

use std::borrow::Cow;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, State},
    http::{Method, Uri},
    response::{IntoResponse, Response},
};
use tracing::{error, info};

use crate::config::Config;
use crate::models::Resolution;
use crate::resolver::Resolver;
use crate::storage::S3Bucket;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
}

impl AppState {
    /// Creates a new AppState around the given resolver.
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds one S3 client per bucket.
    pub fn from_config(config: &Config) -> Self {
        let source = S3Bucket::new(&config.s3.source);
        let target = S3Bucket::new(&config.s3.target);
        Self::new(Resolver::new(
            Arc::new(source),
            Arc::new(target),
            config.cache_error_duration(),
        ))
    }
}

/// Derives the object key from a request path.
///
/// Strips the leading `/` and percent-decodes the rest. A path that does not
/// decode to UTF-8 is used as-is.
pub fn object_key(path: &str) -> String {
    let raw = path.strip_prefix('/').unwrap_or(path);
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// Fallback handler for every path and method.
///
/// The method is only recorded in the log record. Every request logs one
/// record with the client address and object key, at `error` when neither
/// bucket returned the object.
pub async fn proxy_handler(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    method: Method,
    uri: Uri,
) -> Response {
    let key = object_key(uri.path());
    let client = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let resolution = state.resolver.resolve(&key).await;

    match &resolution {
        Resolution::Found(object) => info!(
            client = %client,
            object_key = %key,
            object_source = %object.origin,
            "{} {}",
            method,
            uri.path()
        ),
        Resolution::CachedMiss => info!(
            client = %client,
            object_key = %key,
            object_source = "negative_cache",
            "{} {}",
            method,
            uri.path()
        ),
        Resolution::Miss => error!(
            client = %client,
            object_key = %key,
            "{} {} failed to fetch object",
            method,
            uri.path()
        ),
    }

    resolution.into_response()
}
