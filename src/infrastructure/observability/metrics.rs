//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use metrics::{Counter, Gauge, Histogram, Key, Label, Level, Metadata, Recorder, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use tokio::task::JoinHandle;

pub const APP_INFO: &str = "app_info";
pub const BY_ENDPOINT_COUNTER: &str = "by_endpoint_counter";
pub const INVOCATION_BY_TYPE: &str = "invocation_by_type";
pub const REQUESTS_BY_STATUS: &str = "requests_by_status";
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION: &str = "http_request_duration_seconds";
pub const HTTP_SERVER_ERRORS_TOTAL: &str = "http_server_errors_total";

static METADATA: Metadata<'static> = Metadata::new(module_path!(), Level::INFO, Some(module_path!()));

/// Labels describing one finished HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequestSample<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub endpoint: &'a str,
    pub status: u16,
    pub duration: Duration,
}

/// Process-wide metrics registry backed by a Prometheus recorder.
///
/// Series are keyed by name and label set inside the recorder, so asking for
/// the same counter twice hands back the same series.
#[derive(Clone)]
pub struct MetricsRecorder {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
}

impl std::fmt::Debug for MetricsRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRecorder").finish_non_exhaustive()
    }
}

impl MetricsRecorder {
    /// Build a recorder, describe every metric and publish `app_info`
    pub fn new(version: &str) -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let metrics = Self {
            recorder: Arc::new(recorder),
            handle,
        };

        metrics.describe();
        metrics
            .gauge(APP_INFO, vec![Label::new("version", version.to_string())])
            .set(1.0);

        metrics
    }

    fn describe(&self) {
        let describe_counter = |name: &'static str, help: &'static str| {
            self.recorder
                .describe_counter(name.into(), Some(Unit::Count), help.into());
        };

        self.recorder.describe_gauge(
            APP_INFO.into(),
            None,
            "Application info".into(),
        );
        describe_counter(BY_ENDPOINT_COUNTER, "Request count by endpoints");
        describe_counter(INVOCATION_BY_TYPE, "Number of invocations by type");
        describe_counter(HTTP_REQUESTS_TOTAL, "Total HTTP requests by method, path and status");
        describe_counter(HTTP_SERVER_ERRORS_TOTAL, "HTTP requests answered with a 5xx status");
        self.recorder.describe_histogram(
            REQUESTS_BY_STATUS.into(),
            Some(Unit::Seconds),
            "Request latencies by status".into(),
        );
        self.recorder.describe_histogram(
            HTTP_REQUEST_DURATION.into(),
            Some(Unit::Seconds),
            "HTTP request latencies".into(),
        );
    }

    /// Counter series for `name` and `labels`
    pub fn counter(&self, name: &'static str, labels: Vec<Label>) -> Counter {
        self.recorder
            .register_counter(&Key::from_parts(name, labels), &METADATA)
    }

    /// Summary series for `name` and `labels`
    pub fn summary(&self, name: &'static str, labels: Vec<Label>) -> Histogram {
        self.recorder
            .register_histogram(&Key::from_parts(name, labels), &METADATA)
    }

    fn gauge(&self, name: &'static str, labels: Vec<Label>) -> Gauge {
        self.recorder
            .register_gauge(&Key::from_parts(name, labels), &METADATA)
    }

    /// Record a finished HTTP request once its final status is known
    pub fn record_http_request(&self, sample: &HttpRequestSample<'_>) {
        let status = sample.status.to_string();
        let seconds = sample.duration.as_secs_f64();

        self.counter(
            BY_ENDPOINT_COUNTER,
            vec![Label::new("endpoint", sample.endpoint.to_string())],
        )
        .increment(1);

        self.summary(REQUESTS_BY_STATUS, vec![Label::new("status", status.clone())])
            .record(seconds);

        let labels = vec![
            Label::new("method", sample.method.to_string()),
            Label::new("path", sanitize_path(sample.path)),
            Label::new("status", status),
        ];

        self.counter(HTTP_REQUESTS_TOTAL, labels.clone()).increment(1);
        self.summary(HTTP_REQUEST_DURATION, labels.clone()).record(seconds);

        if sample.status >= 500 {
            self.counter(HTTP_SERVER_ERRORS_TOTAL, labels).increment(1);
        }
    }

    /// Count one processed domain item (a stored star, a converted job)
    pub fn record_invocation(&self, item_type: &str) {
        self.counter(
            INVOCATION_BY_TYPE,
            vec![Label::new("item_type", item_type.to_string())],
        )
        .increment(1);
    }

    /// Prometheus text exposition of every series
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Drain summaries periodically so memory stays bounded between scrapes
    pub fn spawn_upkeep(&self, interval: Duration) -> JoinHandle<()> {
        let handle = self.handle.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                handle.run_upkeep();
            }
        })
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: MetricsRecorder, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<MetricsRecorder>) -> impl IntoResponse {
    metrics.render()
}

/// Cap the `path` label; callers pass the matched route template, not the raw URI
fn sanitize_path(path: &str) -> String {
    path.chars().take(50).collect()
}
