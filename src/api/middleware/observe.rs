//! Observation middleware: one root span and one set of request metrics per
//! observed request

use std::convert::Infallible;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{FromRequestParts, MatchedPath, State},
    http::{Request, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::api::routes::Route;
use crate::api::state::AppState;
use crate::api::types::ErrorTag;
use crate::infrastructure::observability::{HttpRequestSample, SpanHandle};

/// Root span of the current request, available to handlers as an extractor
#[derive(Debug, Clone)]
pub struct RequestSpan(pub SpanHandle);

impl<S> FromRequestParts<S> for RequestSpan
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestSpan>()
            .cloned()
            .unwrap_or_else(|| RequestSpan(SpanHandle::detached())))
    }
}

/// Start metrics, open the root span, run the handler, then close the span
/// and record metrics with the final status
pub async fn observe_request(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = extract_path(&request);
    let endpoint = Route::from_path(&path)
        .map(|route| route.endpoint())
        .unwrap_or("unknown");

    let span = state
        .spans
        .start_root(format!("{} {}", method, path), request.headers());
    span.set_tag("http.method", method.to_string());
    span.set_tag("http.route", path.clone());
    span.set_tag("endpoint", endpoint);
    span.set_tag("service.flavour", state.profile.flavour.as_str());
    request.extensions_mut().insert(RequestSpan(span.handle()));

    let response = next.run(request).await;
    let status = response.status();

    span.set_tag("http.status_code", i64::from(status.as_u16()));
    match response.extensions().get::<ErrorTag>() {
        Some(tag) => {
            span.set_tag("error.kind", tag.kind);
            span.mark_error(tag.message.clone());
        }
        None if status.is_server_error() => {
            span.mark_error(status.canonical_reason().unwrap_or("Server error"));
        }
        None => {}
    }
    span.end();

    state.metrics.record_http_request(&HttpRequestSample {
        method: method.as_str(),
        path: &path,
        endpoint,
        status: status.as_u16(),
        duration: start.elapsed(),
    });

    response
}

pub(crate) fn extract_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}
