//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, JobsConfig, LogFormat, LoggingConfig, ServerConfig, ServiceConfig, StoreConfig,
};
