//! API Routes
//!
//! Configures the Axum router for the proxy.

use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers::{proxy_handler, AppState};

/// Creates the router.
///
/// There are no fixed routes: every path and method falls through to
/// [`proxy_handler`], which treats the path as an object key.
///
/// # Middleware
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(proxy_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
