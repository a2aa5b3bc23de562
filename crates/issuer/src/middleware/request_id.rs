//! Request ID middleware for correlating issuer logs and Sentry events.
//!
//! An upstream `x-request-id` is reused when it is short printable ASCII;
//! anything else is replaced with a fresh UUID v4. The id is recorded on the
//! current span, tagged in the Sentry scope and echoed in the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream request id that is trusted as-is.
const MAX_UPSTREAM_LENGTH: usize = 128;

/// Middleware that ensures every request has a request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = upstream_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

fn upstream_id(request: &Request) -> Option<String> {
    let value = request.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?;

    let acceptable = !value.is_empty()
        && value.len() <= MAX_UPSTREAM_LENGTH
        && value.bytes().all(|b| b.is_ascii_graphic());

    acceptable.then(|| value.to_owned())
}
