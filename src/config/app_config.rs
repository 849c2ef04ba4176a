use serde::Deserialize;

use crate::domain::{ServiceFlavour, ServiceProfile};
use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration, read once at start-up
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub service: ServiceConfig,
    pub store: StoreConfig,
    pub jobs: JobsConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Which flavour runs and how it identifies itself
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub flavour: ServiceFlavour,
    /// Overrides the flavour's default service name
    pub name: Option<String>,
    /// Reported in the `app_info` metric
    pub version: String,
}

/// Record store connection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// `<scheme>://<host>[:<port>]/<database>`
    pub uri: String,
    pub collection: String,
    /// Bound on every store call, in milliseconds
    pub timeout_ms: u64,
    pub max_connections: u32,
}

/// Upstream job listings used by the trial flavour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    pub listing_url: String,
    pub timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            flavour: ServiceFlavour::Backend,
            name: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: "memory://localhost/reference-app".to_string(),
            collection: "stars".to_string(),
            timeout_ms: 5_000,
            max_connections: 10,
        }
    }
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            listing_url: "https://jobs.github.com/positions.json?description=python".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Service identity; tracing's `service_name` wins over `service.name`
    pub fn service_profile(&self) -> ServiceProfile {
        let name = self
            .observability
            .tracing
            .service_name
            .clone()
            .or_else(|| self.service.name.clone());

        let profile = ServiceProfile::new(self.service.flavour).with_version(&self.service.version);

        match name {
            Some(name) => profile.with_name(name),
            None => profile,
        }
    }
}
