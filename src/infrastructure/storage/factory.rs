//! Store selection from the connection URI

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;

use crate::config::StoreConfig;
use crate::domain::DomainError;
use crate::domain::star::StarRepository;

use super::in_memory::InMemoryStarRepository;
use super::postgres::{PostgresConfig, PostgresStarRepository};
use super::timed::TimedStarRepository;

static COLLECTION_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").unwrap());

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-process storage (for testing/development)
    InMemory,
    /// PostgreSQL JSONB collection
    Postgres,
}

impl StorageType {
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme.to_lowercase().as_str() {
            "memory" | "inmemory" | "mem" => Some(Self::InMemory),
            "postgres" | "postgresql" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Parsed `<scheme>://<host>[:<port>]/<database>` connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreUri {
    pub storage_type: StorageType,
    pub host: String,
    pub port: Option<u16>,
    pub database: String,
    raw: String,
}

impl StoreUri {
    pub fn parse(uri: &str) -> Result<Self, DomainError> {
        let url = Url::parse(uri)
            .map_err(|e| DomainError::configuration(format!("Invalid store URI '{}': {}", uri, e)))?;

        let storage_type = StorageType::from_scheme(url.scheme()).ok_or_else(|| {
            DomainError::configuration(format!(
                "Unsupported store scheme '{}'. Expected memory or postgres",
                url.scheme()
            ))
        })?;

        let host = url.host_str().unwrap_or_default().to_string();
        let database = url.path().trim_start_matches('/').to_string();

        if storage_type == StorageType::Postgres && (host.is_empty() || database.is_empty()) {
            return Err(DomainError::configuration(format!(
                "Store URI '{}' must name a host and a database",
                uri
            )));
        }

        Ok(Self {
            storage_type,
            host,
            port: url.port(),
            database,
            raw: uri.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Reject collection names that are not plain SQL identifiers
pub fn validate_collection_name(name: &str) -> Result<(), DomainError> {
    if COLLECTION_NAME.is_match(name) {
        Ok(())
    } else {
        Err(DomainError::configuration(format!(
            "Invalid collection name '{}'. Use letters, digits and underscores",
            name
        )))
    }
}

/// Factory for the star store
#[derive(Debug)]
pub struct StoreFactory;

impl StoreFactory {
    /// Connect the store named by `config.uri`, wrapped in the call timeout
    pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn StarRepository>, DomainError> {
        let uri = StoreUri::parse(&config.uri)?;
        validate_collection_name(&config.collection)?;
        let timeout = Duration::from_millis(config.timeout_ms);

        let inner: Arc<dyn StarRepository> = match uri.storage_type {
            StorageType::InMemory => Arc::new(InMemoryStarRepository::new()),
            StorageType::Postgres => {
                let pg_config = PostgresConfig::new(uri.as_str())
                    .with_max_connections(config.max_connections)
                    .with_acquire_timeout(timeout);
                Arc::new(PostgresStarRepository::connect(&pg_config, &config.collection).await?)
            }
        };

        tracing::info!(
            storage = ?uri.storage_type,
            host = %uri.host,
            database = %uri.database,
            collection = %config.collection,
            "Record store connected"
        );

        Ok(Arc::new(TimedStarRepository::new(inner, timeout)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_postgres_uri() {
        let uri = StoreUri::parse("postgres://example-db-svc:5432/example").unwrap();

        assert_eq!(uri.storage_type, StorageType::Postgres);
        assert_eq!(uri.host, "example-db-svc");
        assert_eq!(uri.port, Some(5432));
        assert_eq!(uri.database, "example");
    }

    #[test]
    fn test_parse_memory_uri_without_database() {
        let uri = StoreUri::parse("memory://local").unwrap();

        assert_eq!(uri.storage_type, StorageType::InMemory);
        assert_eq!(uri.port, None);
        assert_eq!(uri.database, "");
    }

    #[test]
    fn test_parse_rejects_unknown_scheme() {
        let err = StoreUri::parse("mongodb://localhost:27017/example").unwrap_err();
        assert!(err.to_string().contains("Unsupported store scheme"));
    }

    #[test]
    fn test_parse_rejects_postgres_without_database() {
        assert!(StoreUri::parse("postgres://localhost:5432").is_err());
        assert!(StoreUri::parse("not a uri").is_err());
    }

    #[test]
    fn test_validate_collection_name() {
        assert!(validate_collection_name("stars").is_ok());
        assert!(validate_collection_name("_stars_v2").is_ok());
        assert!(validate_collection_name("stars; DROP TABLE x").is_err());
        assert!(validate_collection_name("2stars").is_err());
    }

    #[tokio::test]
    async fn test_connect_memory_store() {
        let config = StoreConfig {
            uri: "memory://local/reference".to_string(),
            ..StoreConfig::default()
        };

        let store = StoreFactory::connect(&config).await.unwrap();
        assert!(store.ping().await.is_ok());
    }
}
