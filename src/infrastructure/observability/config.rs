//! Observability configuration

use serde::Deserialize;

/// Main observability configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub tracing: TracingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Distributed tracing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TracingConfig {
    /// Export spans to the trace agent
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Trace agent host
    #[serde(default = "default_agent_host")]
    pub agent_host: String,
    /// Trace agent OTLP/gRPC port
    #[serde(default = "default_agent_port")]
    pub agent_port: u16,
    /// Overrides the flavour's default service name
    #[serde(default)]
    pub service_name: Option<String>,
    /// Sampling ratio (0.0 to 1.0)
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
    /// Export timeout in milliseconds
    #[serde(default = "default_export_timeout_ms")]
    pub export_timeout_ms: u64,
}

/// Prometheus metrics configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Expose the scrape endpoint
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Metrics endpoint path
    #[serde(default = "default_metrics_path")]
    pub path: String,
    /// Seconds between summary upkeep runs
    #[serde(default = "default_upkeep_interval_secs")]
    pub upkeep_interval_secs: u64,
}

impl TracingConfig {
    /// OTLP endpoint derived from the agent host and port
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}", self.agent_host, self.agent_port)
    }
}

fn default_agent_host() -> String {
    "localhost".to_string()
}

fn default_agent_port() -> u16 {
    4317
}

fn default_sampling_ratio() -> f64 {
    1.0
}

fn default_export_timeout_ms() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_upkeep_interval_secs() -> u64 {
    5
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            agent_host: default_agent_host(),
            agent_port: default_agent_port(),
            service_name: None,
            sampling_ratio: default_sampling_ratio(),
            export_timeout_ms: default_export_timeout_ms(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_metrics_path(),
            upkeep_interval_secs: default_upkeep_interval_secs(),
        }
    }
}
