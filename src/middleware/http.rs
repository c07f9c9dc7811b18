//! HTTP-level middleware applied to the whole router.
//!
//! Every request gets an `x-request-id` (generated when absent) which is echoed
//! on the response and recorded on the request span, so token rejections logged
//! by the access middleware can be correlated with the access log.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::http::{Request, StatusCode, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

const REQUEST_ID: &str = "x-request-id";

// Tokens travel in headers; request bodies stay small.
const BODY_LIMIT_BYTES: usize = 64 * 1024;

fn request_span(req: &Request<Body>) -> Span {
    let request_id = req
        .headers()
        .get(REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
        request_id = %request_id,
    )
}

async fn handle_layer_error(err: BoxError) -> StatusCode {
    if err.is::<tower::timeout::error::Elapsed>() {
        StatusCode::REQUEST_TIMEOUT
    } else {
        tracing::error!(error = %err, "unhandled middleware error");
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

pub fn apply(router: Router, timeout: Duration) -> Router {
    let header = HeaderName::from_static(REQUEST_ID);

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(header.clone(), MakeRequestUuid))
            .layer(PropagateRequestIdLayer::new(header))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(HandleErrorLayer::new(handle_layer_error))
            .layer(TimeoutLayer::new(timeout))
            .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES)),
    )
}
