//! Call timeout around any star store

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::star::{NewStar, Star, StarId, StarRepository};

use super::STORE_UPSTREAM;

/// Bounds every store call so a stalled database cannot hold a request forever
#[derive(Debug)]
pub struct TimedStarRepository {
    inner: Arc<dyn StarRepository>,
    timeout: Duration,
}

impl TimedStarRepository {
    pub fn new(inner: Arc<dyn StarRepository>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| DomainError::upstream_timeout(STORE_UPSTREAM, self.timeout))?
    }
}

#[async_trait]
impl StarRepository for TimedStarRepository {
    async fn insert(&self, star: NewStar) -> Result<StarId, DomainError> {
        self.bounded(self.inner.insert(star)).await
    }

    async fn find_by_id(&self, id: &StarId) -> Result<Option<Star>, DomainError> {
        self.bounded(self.inner.find_by_id(id)).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.bounded(self.inner.ping()).await
    }
}
