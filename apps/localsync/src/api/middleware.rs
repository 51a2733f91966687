//! # Middleware Module
//!
//! CORS and content-type handling for the LocalSync HTTP API.
//!
//! Plugins are loaded by client apps from arbitrary origins (file://, TV
//! webviews, localhost dev servers), so the CORS policy is fully permissive.
//! Neither middleware ever changes the status code chosen by a handler.

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Content type forced onto plugin scripts.
pub const JAVASCRIPT_CONTENT_TYPE: &str = "application/javascript; charset=utf-8";

/// Headers stamped onto every response.
const CORS_HEADERS: [(&str, &str); 8] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "*"),
    ("access-control-allow-headers", "*"),
    ("access-control-allow-credentials", "true"),
    ("access-control-expose-headers", "*"),
    ("cross-origin-resource-policy", "cross-origin"),
    ("cross-origin-embedder-policy", "unsafe-none"),
    ("cross-origin-opener-policy", "unsafe-none"),
];

// =============================================================================
// CORS
// =============================================================================

/// CORS middleware.
///
/// Answers `OPTIONS` preflight requests with `200 OK` without reaching the
/// handler, and adds the CORS headers to every other response.
pub async fn cors_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    set_cors_headers(response.headers_mut());
    response
}

fn set_cors_headers(headers: &mut HeaderMap) {
    for (name, value) in CORS_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}

// =============================================================================
// PLUGIN CONTENT TYPE
// =============================================================================

/// Serve plugin scripts as JavaScript.
///
/// Some client webviews refuse to execute scripts delivered as `text/plain`
/// or without a content type. Successful responses for `.js` paths, or with a
/// missing or plain/legacy JavaScript content type, are relabelled.
pub async fn plugin_content_type_middleware(request: Request<Body>, next: Next) -> Response {
    let is_script = request.uri().path().ends_with(".js");
    let mut response = next.run(request).await;

    if !response.status().is_success() {
        return response;
    }

    let current = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if is_script || needs_javascript_content_type(current) {
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JAVASCRIPT_CONTENT_TYPE),
        );
    }

    response
}

/// Whether a content type should be replaced by the JavaScript one.
pub fn needs_javascript_content_type(content_type: &str) -> bool {
    matches!(
        content_type,
        "" | "text/plain" | "text/javascript" | "text/javascript; charset=utf-8"
    )
}

// =============================================================================
// TESTS
// =============================================================================
