//! In-memory star store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::DomainError;
use crate::domain::star::{NewStar, Star, StarId, StarRepository};

/// Thread-safe in-memory star store
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryStarRepository {
    stars: RwLock<HashMap<StarId, Star>>,
}

impl InMemoryStarRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored stars
    pub fn len(&self) -> usize {
        self.stars.read().map(|stars| stars.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StarRepository for InMemoryStarRepository {
    async fn insert(&self, star: NewStar) -> Result<StarId, DomainError> {
        let id = StarId::from_uuid(Uuid::new_v4());
        let mut stars = self.stars.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        stars.insert(id, Star::new(id, star));
        Ok(id)
    }

    async fn find_by_id(&self, id: &StarId) -> Result<Option<Star>, DomainError> {
        let stars = self.stars.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(stars.get(id).cloned())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
