//! OpenTelemetry tracer provider setup

use std::time::Duration;

use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource, runtime,
    trace::{RandomIdGenerator, Sampler, TracerProvider},
};

use super::config::TracingConfig;
use super::span::SpanEmitter;

/// Owns the process-wide tracer provider until shutdown
#[derive(Debug, Clone)]
pub struct Telemetry {
    provider: TracerProvider,
}

impl Telemetry {
    /// Build the provider; falls back to a non-exporting provider when the
    /// exporter cannot be created
    pub fn init(config: &TracingConfig, service_name: &str) -> Self {
        if !config.enabled {
            tracing::info!("Span export disabled");
            return Self::disabled(service_name);
        }

        match init_otel_tracing(config, service_name) {
            Ok(provider) => {
                tracing::info!(
                    service = %service_name,
                    "Span export initialized to {}",
                    config.endpoint()
                );
                Self { provider }
            }
            Err(e) => {
                tracing::warn!("Failed to initialize OpenTelemetry: {}. Span export disabled.", e);
                Self::disabled(service_name)
            }
        }
    }

    /// Spans are created and sampled but never leave the process
    pub fn disabled(service_name: &str) -> Self {
        Self {
            provider: TracerProvider::builder()
                .with_resource(service_resource(service_name))
                .build(),
        }
    }

    /// Wrap a provider built elsewhere, such as one exporting to memory
    pub fn from_provider(provider: TracerProvider) -> Self {
        Self { provider }
    }

    pub fn span_emitter(&self) -> SpanEmitter {
        SpanEmitter::new(&self.provider)
    }

    /// Flush pending spans and stop the batch exporter
    pub fn shutdown(&self) {
        if let Err(e) = self.provider.shutdown() {
            tracing::warn!("Tracer provider shutdown failed: {}", e);
        }
        tracing::info!("Tracing shutdown complete");
    }
}

fn service_resource(service_name: &str) -> Resource {
    Resource::new(vec![
        KeyValue::new("service.name", service_name.to_string()),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ])
}

/// Map a sampling ratio onto a sampler; a sampled parent is always honoured
pub fn sampler_for(ratio: f64) -> Sampler {
    let root = if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    };

    Sampler::ParentBased(Box::new(root))
}

fn init_otel_tracing(
    config: &TracingConfig,
    service_name: &str,
) -> Result<TracerProvider, opentelemetry::trace::TraceError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(config.endpoint())
        .with_timeout(Duration::from_millis(config.export_timeout_ms))
        .build()?;

    let provider = TracerProvider::builder()
        .with_sampler(sampler_for(config.sampling_ratio))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(service_resource(service_name))
        .with_batch_exporter(exporter, runtime::Tokio)
        .build();

    Ok(provider)
}
