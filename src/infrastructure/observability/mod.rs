//! Observability infrastructure - Tracing, Metrics, and Logging

mod config;
mod metrics;
mod span;
mod tracing_setup;

pub use config::{MetricsConfig, ObservabilityConfig, TracingConfig};
pub use metrics::{HttpRequestSample, MetricsRecorder, create_metrics_router};
pub use opentelemetry::KeyValue;
pub use span::{ScopedSpan, SpanEmitter, SpanHandle};
pub use tracing_setup::{Telemetry, sampler_for};
