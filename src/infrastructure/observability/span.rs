//! Scoped spans on top of the OpenTelemetry tracing API
//!
//! A [`ScopedSpan`] ends when it is dropped, so a span opened around a unit of
//! work closes on every exit path, including early returns through `?`.
//! [`SpanHandle`] is the non-owning view handed to request handlers.

use std::borrow::Cow;

use axum::http::HeaderMap;
use opentelemetry::{
    Context, Key, KeyValue, Value,
    propagation::{Extractor, Injector, TextMapPropagator},
    trace::{SpanKind, Status, TraceContextExt, Tracer as _, TracerProvider as _},
};
use opentelemetry_sdk::{
    propagation::TraceContextPropagator,
    trace::{Tracer, TracerProvider},
};

const INSTRUMENTATION_SCOPE: &str = "reference-app";

/// Opens spans for units of work
#[derive(Clone)]
pub struct SpanEmitter {
    tracer: Tracer,
    propagator: TraceContextPropagator,
}

impl std::fmt::Debug for SpanEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanEmitter").finish_non_exhaustive()
    }
}

impl SpanEmitter {
    pub fn new(provider: &TracerProvider) -> Self {
        Self {
            tracer: provider.tracer(INSTRUMENTATION_SCOPE),
            propagator: TraceContextPropagator::new(),
        }
    }

    /// Open the root span of an inbound request, continuing the caller's
    /// trace when a `traceparent` header is present
    pub fn start_root(&self, name: impl Into<Cow<'static, str>>, headers: &HeaderMap) -> ScopedSpan {
        let parent_cx = self.propagator.extract(&HeaderExtractor(headers));
        let span = self
            .tracer
            .span_builder(name)
            .with_kind(SpanKind::Server)
            .start_with_context(&self.tracer, &parent_cx);

        ScopedSpan::new(parent_cx.with_span(span), self.propagator.clone())
    }

    /// Open a span nested under `parent`, sharing its trace id
    pub fn start_child(&self, name: impl Into<Cow<'static, str>>, parent: &SpanHandle) -> ScopedSpan {
        let span = self
            .tracer
            .span_builder(name)
            .with_kind(SpanKind::Internal)
            .start_with_context(&self.tracer, &parent.cx);

        ScopedSpan::new(parent.cx.with_span(span), self.propagator.clone())
    }
}

/// Non-owning reference to an open span
#[derive(Clone)]
pub struct SpanHandle {
    cx: Context,
    propagator: TraceContextPropagator,
}

impl std::fmt::Debug for SpanHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanHandle")
            .field("trace_id", &self.trace_id())
            .field("span_id", &self.span_id())
            .finish()
    }
}

impl SpanHandle {
    /// A handle with no recording span behind it
    pub fn detached() -> Self {
        Self {
            cx: Context::new(),
            propagator: TraceContextPropagator::new(),
        }
    }

    pub fn set_tag(&self, key: impl Into<Key>, value: impl Into<Value>) {
        self.cx.span().set_attribute(KeyValue::new(key, value));
    }

    /// Record a timestamped event carrying `fields`
    pub fn log_event(&self, name: impl Into<Cow<'static, str>>, fields: Vec<KeyValue>) {
        self.cx.span().add_event(name, fields);
    }

    /// Flag the span as failed
    pub fn mark_error(&self, message: impl Into<String>) {
        let message = message.into();
        let span = self.cx.span();

        span.set_attribute(KeyValue::new("error", true));
        span.set_attribute(KeyValue::new("error.message", message.clone()));
        span.set_status(Status::error(message));
    }

    pub fn trace_id(&self) -> String {
        self.cx.span().span_context().trace_id().to_string()
    }

    pub fn span_id(&self) -> String {
        self.cx.span().span_context().span_id().to_string()
    }

    /// W3C propagation headers for an outbound call made under this span
    pub fn trace_headers(&self) -> Vec<(String, String)> {
        let mut injector = HeaderInjector::default();
        self.propagator.inject_context(&self.cx, &mut injector);
        injector.0
    }
}

/// Owning span that ends when dropped
pub struct ScopedSpan {
    handle: SpanHandle,
}

impl ScopedSpan {
    fn new(cx: Context, propagator: TraceContextPropagator) -> Self {
        Self {
            handle: SpanHandle { cx, propagator },
        }
    }

    pub fn handle(&self) -> SpanHandle {
        self.handle.clone()
    }

    /// End the span now instead of at scope exit
    pub fn end(self) {}
}

impl std::ops::Deref for ScopedSpan {
    type Target = SpanHandle;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl Drop for ScopedSpan {
    fn drop(&mut self) {
        self.handle.cx.span().end();
    }
}

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|name| name.as_str()).collect()
    }
}

#[derive(Default)]
struct HeaderInjector(Vec<(String, String)>);

impl Injector for HeaderInjector {
    fn set(&mut self, key: &str, value: String) {
        self.0.push((key.to_string(), value));
    }
}
