//! Per-request trace ids

use crate::core::error::REQUEST_TRACE_ID;
use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

/// HTTP header name for trace ID
pub const TRACE_ID_HEADER: &str = "X-Trace-Id";

/// Middleware that assigns a trace ID to each request and propagates it
/// through the request lifecycle.
///
/// The trace ID is:
/// - Taken from an incoming `X-Trace-Id` header when it is a valid UUID,
///   otherwise generated as a UUID v4
/// - Readable from handlers through [`current_trace_id`](crate::core::error::current_trace_id)
/// - Attached to every log entry through a tracing span
/// - Echoed in the response headers and in error bodies
pub async fn trace_id_middleware(request: Request, next: Next) -> Response {
    let trace_id = request
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .unwrap_or_else(Uuid::new_v4)
        .to_string();

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %request.method(),
        uri = %request.uri(),
    );

    let mut response = REQUEST_TRACE_ID
        .scope(
            trace_id.clone(),
            async move {
                let response = next.run(request).await;
                tracing::info!(status = %response.status(), "Request completed");
                response
            }
            .instrument(span),
        )
        .await;

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }

    response
}
