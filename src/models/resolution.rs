//! Resolution outcomes and their HTTP responses.

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::ResolvedObject;

/// Cache-Control sent with served objects.
pub const OBJECT_CACHE_CONTROL: &str = "public, max-age=31536000";

/// Cache-Control sent with the failed-fetch response.
pub const MISS_CACHE_CONTROL: &str = "public, max-age=300";

/// Body of the response replayed from the negative cache.
pub const NOT_FOUND_BODY: &str = "Not found";

/// Body of the response when neither bucket returned the object.
pub const FETCH_FAILED_BODY: &str = "Failed to fetch object";

/// Terminal state of one pass through the resolver.
#[derive(Debug)]
pub enum Resolution {
    /// The key was remembered as absent; no bucket was queried
    CachedMiss,
    /// The object was found in the target or source bucket
    Found(ResolvedObject),
    /// Both lookups failed; a negative cache entry was recorded
    Miss,
}

impl IntoResponse for Resolution {
    fn into_response(self) -> Response {
        match self {
            Resolution::CachedMiss => (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response(),
            Resolution::Miss => (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CACHE_CONTROL, MISS_CACHE_CONTROL)],
                FETCH_FAILED_BODY,
            )
                .into_response(),
            Resolution::Found(object) => object_response(object),
        }
    }
}

fn object_response(object: ResolvedObject) -> Response {
    let mut response = Response::new(Body::from_stream(object.body.into_stream()));
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(OBJECT_CACHE_CONTROL),
    );

    for (name, value) in &object.metadata {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => warn!(
                object_key = %object.key,
                header = %name,
                "Skipping metadata entry that is not a valid HTTP header"
            ),
        }
    }

    response
}
