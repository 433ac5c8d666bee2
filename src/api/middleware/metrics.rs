//! HTTP metrics middleware for recording request/response metrics

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::infrastructure::observability::record_http_request;

/// Label used for requests that matched no route
pub const UNMATCHED_ENDPOINT: &str = "unmatched";

/// Middleware to record HTTP request metrics
///
/// Layered onto the API routes before the metrics route is merged in, so
/// scrapes are not counted.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let endpoint = endpoint_label(&request);

    let response = next.run(request).await;

    record_http_request(
        method.as_str(),
        &endpoint,
        response.status().as_u16(),
        start.elapsed(),
    );

    response
}

/// Route template for the request, keeping label cardinality bounded
fn endpoint_label<B>(request: &Request<B>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ENDPOINT.to_string())
}
