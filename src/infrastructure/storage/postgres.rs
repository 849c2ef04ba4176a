//! PostgreSQL document store for stars
//!
//! Each collection is a table of `(_id UUID, data JSONB)` rows. The database
//! assigns `_id`; `data` holds the `{name, distance}` document.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use crate::domain::DomainError;
use crate::domain::star::{NewStar, Star, StarId, StarRepository};

use super::STORE_UPSTREAM;

/// PostgreSQL storage configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Time allowed to obtain a pooled connection
    pub acquire_timeout: Duration,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }
}

/// Star store backed by a PostgreSQL JSONB collection
pub struct PostgresStarRepository {
    pool: PgPool,
    collection: String,
    acquire_timeout: Duration,
}

impl Debug for PostgresStarRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStarRepository")
            .field("collection", &self.collection)
            .finish()
    }
}

impl PostgresStarRepository {
    /// `collection` must already be validated as a plain SQL identifier
    pub fn new(pool: PgPool, collection: impl Into<String>) -> Self {
        Self {
            pool,
            collection: collection.into(),
            acquire_timeout: Duration::from_secs(5),
        }
    }

    /// Connect once for the lifetime of the process and make sure the
    /// collection exists
    pub async fn connect(config: &PostgresConfig, collection: &str) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        let mut store = Self::new(pool, collection);
        store.acquire_timeout = config.acquire_timeout;
        store.ensure_collection().await?;

        Ok(store)
    }

    /// Ensures the collection table exists
    pub async fn ensure_collection(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                _id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.collection
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create collection", e, self.acquire_timeout))?;

        Ok(())
    }
}

fn map_sqlx_error(action: &str, error: sqlx::Error, acquire_timeout: Duration) -> DomainError {
    match error {
        sqlx::Error::PoolTimedOut => DomainError::upstream_timeout(STORE_UPSTREAM, acquire_timeout),
        other => DomainError::storage(format!("Failed to {}: {}", action, other)),
    }
}

#[async_trait]
impl StarRepository for PostgresStarRepository {
    async fn insert(&self, star: NewStar) -> Result<StarId, DomainError> {
        let data = serde_json::to_value(&star)
            .map_err(|e| DomainError::internal(format!("Failed to serialize star: {}", e)))?;
        let query = format!(
            "INSERT INTO {} (data) VALUES ($1) RETURNING _id",
            self.collection
        );

        let id: Uuid = sqlx::query_scalar(&query)
            .bind(data)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert star", e, self.acquire_timeout))?;

        Ok(StarId::from_uuid(id))
    }

    async fn find_by_id(&self, id: &StarId) -> Result<Option<Star>, DomainError> {
        let query = format!("SELECT data FROM {} WHERE _id = $1", self.collection);

        let row = sqlx::query(&query)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get star", e, self.acquire_timeout))?;

        match row {
            Some(row) => {
                let data: serde_json::Value = row.get("data");
                let star: NewStar = serde_json::from_value(data).map_err(|e| {
                    DomainError::storage(format!("Failed to deserialize star: {}", e))
                })?;
                Ok(Some(Star::new(*id, star)))
            }
            None => Ok(None),
        }
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ping store", e, self.acquire_timeout))?;

        Ok(())
    }
}
